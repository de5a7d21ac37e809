use crate::{traits::Preprocessor, types::Raster};

/// Normalized `side x side` Gaussian kernel with `sigma = kernel_size / 6`,
/// where `side = 2 * (kernel_size / 2) + 1`.
fn gaussian_kernel(kernel_size: u32) -> Vec<f64> {
    let radius = (kernel_size / 2) as i64;
    let side = (2 * radius + 1) as usize;
    let sigma = kernel_size as f64 / 6.0;
    let denom = 2.0 * sigma * sigma;

    let mut kernel = Vec::with_capacity(side * side);
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            kernel.push((-((dx * dx + dy * dy) as f64) / denom).exp());
        }
    }

    let sum: f64 = kernel.iter().sum();
    for weight in &mut kernel {
        *weight /= sum;
    }
    kernel
}

/// Convolve with a Gaussian kernel of side `kernel_size`, replicating edge pixels.
///
/// `kernel_size <= 1` returns the input unchanged.
pub fn gaussian_blur(raster: &Raster, kernel_size: u32) -> Raster {
    if kernel_size <= 1 {
        return raster.clone();
    }

    let kernel = gaussian_kernel(kernel_size);
    let radius = (kernel_size / 2) as i64;
    let side = 2 * radius + 1;

    Raster::from_fn(raster.width(), raster.height(), |x, y| {
        let (x, y) = (x as i64, y as i64);
        let mut sum = 0.0;
        for ky in -radius..=radius {
            let row = ((ky + radius) * side) as usize;
            for kx in -radius..=radius {
                let weight = kernel[row + (kx + radius) as usize];
                sum += raster.clamped(x + kx, y + ky) as f64 * weight;
            }
        }
        (sum as i32).clamp(0, 255) as u8
    })
}

/// Replace every sample by the median of its `kernel_size x kernel_size`
/// neighborhood, replicating edge pixels.
///
/// `kernel_size <= 1` returns the input unchanged.
pub fn median_blur(raster: &Raster, kernel_size: u32) -> Raster {
    if kernel_size <= 1 {
        return raster.clone();
    }

    let radius = (kernel_size / 2) as i64;
    let side = (2 * radius + 1) as usize;
    let mut window = Vec::with_capacity(side * side);

    Raster::from_fn(raster.width(), raster.height(), |x, y| {
        let (x, y) = (x as i64, y as i64);
        window.clear();
        for ky in -radius..=radius {
            for kx in -radius..=radius {
                window.push(raster.clamped(x + kx, y + ky));
            }
        }
        window.sort_unstable();
        window[window.len() / 2]
    })
}

/// Gaussian blur stage
#[derive(Debug, Clone)]
pub struct GaussianBlurPreprocessor {
    pub kernel_size: u32,
}

impl Default for GaussianBlurPreprocessor {
    fn default() -> Self {
        Self { kernel_size: 3 }
    }
}

impl Preprocessor for GaussianBlurPreprocessor {
    fn preprocess(&self, raster: Raster) -> Raster {
        if self.kernel_size <= 1 {
            return raster;
        }
        gaussian_blur(&raster, self.kernel_size)
    }

    fn name(&self) -> String {
        format!("GaussianBlur({})", self.kernel_size)
    }
}

/// Median blur stage
#[derive(Debug, Clone)]
pub struct MedianBlurPreprocessor {
    pub kernel_size: u32,
}

impl Default for MedianBlurPreprocessor {
    fn default() -> Self {
        Self { kernel_size: 3 }
    }
}

impl Preprocessor for MedianBlurPreprocessor {
    fn preprocess(&self, raster: Raster) -> Raster {
        if self.kernel_size <= 1 {
            return raster;
        }
        median_blur(&raster, self.kernel_size)
    }

    fn name(&self) -> String {
        format!("MedianBlur({})", self.kernel_size)
    }
}
