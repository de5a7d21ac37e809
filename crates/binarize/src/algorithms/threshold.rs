use crate::{
    algorithms::integral::IntegralImage,
    types::{BinaryRaster, Raster},
};

/// White where the sample is at least `threshold`.
pub fn global_threshold(raster: &Raster, threshold: u8) -> BinaryRaster {
    BinaryRaster::classify(raster, |p| p >= threshold)
}

/// 256-bin intensity histogram
pub fn histogram(raster: &Raster) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for &p in raster.as_slice() {
        hist[p as usize] += 1;
    }
    hist
}

/// Otsu's threshold for a histogram: the intensity `t` maximizing the
/// between-class variance of the classes `<= t` and `> t`.
///
/// The first maximum wins. A histogram with fewer than two populated bins
/// has zero variance everywhere and yields 0.
pub fn otsu_level(hist: &[u64; 256]) -> u8 {
    let total: u64 = hist.iter().sum();
    let sum: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut sum_b = 0.0;
    let mut w_b = 0u64;
    let mut max_variance = 0.0;
    let mut level = 0u8;

    for (t, &count) in hist.iter().enumerate() {
        w_b += count;
        if w_b == 0 {
            continue;
        }

        let w_f = total - w_b;
        if w_f == 0 {
            break;
        }

        sum_b += t as f64 * count as f64;

        let mean_b = sum_b / w_b as f64;
        let mean_f = (sum - sum_b) / w_f as f64;
        let diff = mean_b - mean_f;
        let variance = w_b as f64 * w_f as f64 * diff * diff;

        if variance > max_variance {
            max_variance = variance;
            level = t as u8;
        }
    }

    level
}

/// Otsu's threshold computed over a raster's histogram
pub fn otsu_threshold(raster: &Raster) -> u8 {
    otsu_level(&histogram(raster))
}

/// Binarize with Otsu's threshold `t`: samples above `t` become white.
pub fn otsu(raster: &Raster) -> (u8, BinaryRaster) {
    let level = otsu_threshold(raster);
    (level, BinaryRaster::classify(raster, |p| p > level))
}

/// Adaptive thresholding against the mean of a `block_size` square window.
///
/// Windows are clipped at the image edges, so border means are taken over
/// fewer pixels. A sample is white when it is at least `mean - c`. Runs in
/// O(width * height) regardless of `block_size`.
pub fn adaptive_mean(raster: &Raster, block_size: u32, c: f64) -> BinaryRaster {
    let integral = IntegralImage::new(raster);
    let width = raster.width() as usize;
    let height = raster.height() as usize;
    let radius = (block_size / 2) as usize;
    let samples = raster.as_slice();

    BinaryRaster::from_fn(raster.width(), raster.height(), |x, y| {
        let (x, y) = (x as usize, y as usize);
        let x1 = x.saturating_sub(radius);
        let y1 = y.saturating_sub(radius);
        let x2 = (x + radius).min(width - 1);
        let y2 = (y + radius).min(height - 1);

        let count = ((x2 - x1 + 1) * (y2 - y1 + 1)) as f64;
        let mean = integral.sum(x1, y1, x2, y2) as f64 / count;

        samples[y * width + x] as f64 >= mean - c
    })
}
