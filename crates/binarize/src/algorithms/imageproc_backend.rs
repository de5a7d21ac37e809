//! Threshold stage delegated to `imageproc`.
//!
//! Results agree with the builtin strategies for Global and Otsu. The
//! adaptive local mean comes from `filter::box_filter`, which replicates
//! edge pixels and rounds to whole intensities, so borders and non-flat
//! regions can differ slightly from the builtin clipped window. The `c` bias
//! is applied the same way on both backends.

use image::GrayImage;
use imageproc::{contrast, filter};

use crate::{
    config::Algorithm,
    types::{BinaryRaster, Raster},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ImageprocThreshold {
    pub algorithm: Algorithm,
    pub threshold: u8,
    pub block_size: u32,
    pub c: f64,
}

impl ImageprocThreshold {
    pub fn apply(&self, raster: &Raster) -> BinaryRaster {
        let image = raster.clone().into_gray_image();

        let output = match self.algorithm.resolved() {
            // `contrast::threshold` whitens samples strictly above its level.
            Algorithm::Global if self.threshold == 0 => {
                return BinaryRaster::classify(raster, |_| true);
            }
            Algorithm::Global => contrast::threshold(&image, self.threshold - 1),
            Algorithm::Otsu => {
                let level = contrast::otsu_level(&image);
                contrast::threshold(&image, level)
            }
            _ => return self.adaptive(&image),
        };

        BinaryRaster::classify(&Raster::from(output), |p| p == 255)
    }

    /// White where `p >= mean - c` over the box filtered neighbourhood
    fn adaptive(&self, image: &GrayImage) -> BinaryRaster {
        let (width, height) = image.dimensions();
        let radius = self.block_size / 2;
        let c = self.c;

        // A single-pixel window is its own mean.
        if radius == 0 {
            return BinaryRaster::from_fn(width, height, |x, y| {
                let p = f64::from(image.get_pixel(x, y)[0]);
                p >= p - c
            });
        }

        let means = filter::box_filter(image, radius, radius);
        BinaryRaster::from_fn(width, height, |x, y| {
            let p = f64::from(image.get_pixel(x, y)[0]);
            p >= f64::from(means.get_pixel(x, y)[0]) - c
        })
    }
}
