use crate::types::Raster;

/// Summed-area table over a raster.
///
/// Stores `(height + 1) x (width + 1)` running sums where entry `(x, y)` is the
/// sum of every sample in the rectangle `(0, 0)..(x - 1, y - 1)`. The extra
/// zero row and column remove edge cases from [`IntegralImage::sum`].
#[derive(Debug, Clone)]
pub struct IntegralImage {
    stride: usize,
    sums: Vec<u64>,
}

impl IntegralImage {
    pub fn new(raster: &Raster) -> Self {
        let width = raster.width() as usize;
        let height = raster.height() as usize;
        let stride = width + 1;
        let mut sums = vec![0u64; stride * (height + 1)];

        for (y, row) in raster.as_slice().chunks_exact(width.max(1)).enumerate().take(height) {
            let mut row_sum = 0u64;
            for (x, &sample) in row.iter().enumerate() {
                row_sum += sample as u64;
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row_sum;
            }
        }

        Self { stride, sums }
    }

    /// Sum of samples in the inclusive rectangle `(x1, y1)..=(x2, y2)`.
    ///
    /// Callers must pass coordinates inside the source raster with `x1 <= x2`
    /// and `y1 <= y2`.
    #[inline]
    pub fn sum(&self, x1: usize, y1: usize, x2: usize, y2: usize) -> u64 {
        let s = self.stride;
        self.sums[(y2 + 1) * s + x2 + 1] + self.sums[y1 * s + x1]
            - self.sums[y1 * s + x2 + 1]
            - self.sums[(y2 + 1) * s + x1]
    }
}
