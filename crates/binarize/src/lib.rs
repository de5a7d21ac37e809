//! # Image Binarization Library
//!
//! Converts arbitrary raster images into strictly two-valued (0/255)
//! grayscale rasters, typically as the cleanup step in front of OCR.
//!
//! ## Core Features
//!
//! - **Threshold Strategies**: fixed global, Otsu and local adaptive mean
//! - **Pre-filtering**: Gaussian or median blur with edge replication
//! - **Post-filtering**: morphological opening and closing
//! - **Pipeline System**: compose custom stages through trait objects
//! - **Config Files**: TOML/JSON configuration with JSON schema generation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use binarize::{BinarizeConfig, binarize_file};
//!
//! let config = BinarizeConfig::for_ocr();
//! let binary = binarize_file("scan.jpg", &config)?;
//! binary.into_gray_image().save("scan.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Pipeline
//!
//! ```rust
//! use binarize::{Binarizer, Pipeline, Raster};
//!
//! let pipeline = Pipeline::builder()
//!     .with_median_blur(3)
//!     .set_binarizer(Binarizer::AdaptiveMean { block_size: 15, c: 5.0 })
//!     .with_opening(3)
//!     .build();
//!
//! let binary = pipeline.process(Raster::filled(64, 64, 200));
//! assert_eq!(binary.dimensions(), (64, 64));
//! ```

pub mod algorithms;
pub mod binarizer;
pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod traits;
pub mod types;

use std::path::Path;

use image::DynamicImage;

pub use binarizer::Binarizer;
pub use config::{Algorithm, Backend, BinarizeConfig, BinarizeConfigBuilder, Preset};
pub use error::{BinarizeError, ConfigError, Result};
pub use io::{load_image, save_binary};
pub use pipeline::{Pipeline, builder::PipelineBuilder};
pub use traits::*;
pub use types::{BLACK, BinaryRaster, Raster, WHITE};

/// Binarize an image of any pixel format
pub fn binarize(image: DynamicImage, config: &BinarizeConfig) -> Result<BinaryRaster> {
    Ok(Pipeline::from_config(config)?.process_image(image))
}

/// Binarize an already-grayscale raster
pub fn binarize_raster(raster: Raster, config: &BinarizeConfig) -> Result<BinaryRaster> {
    Ok(Pipeline::from_config(config)?.process(raster))
}

/// Load an image file and binarize it
pub fn binarize_file<P: AsRef<Path>>(input: P, config: &BinarizeConfig) -> Result<BinaryRaster> {
    // Resolve the strategy before decoding so a bad backend fails fast.
    let pipeline = Pipeline::from_config(config)?;
    Ok(pipeline.process_image(load_image(input)?))
}

/// Load, binarize and save in one step
pub fn binarize_to_file<P, Q>(input: P, output: Q, config: &BinarizeConfig) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let binary = binarize_file(input, config)?;
    save_binary(&binary, output)
}

/// Otsu's threshold for a grayscale raster
pub fn otsu_threshold(raster: &Raster) -> u8 {
    algorithms::threshold::otsu_threshold(raster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};
    use strum::IntoEnumIterator;

    fn is_binary(binary: &BinaryRaster) -> bool {
        binary.as_slice().iter().all(|&v| v == BLACK || v == WHITE)
    }

    fn sample_raster() -> Raster {
        Raster::from_fn(37, 23, |x, y| {
            let lighting = (x * 2 + y) as u8;
            let ink = (x / 4 + y / 3) % 3 == 0;
            if ink { 20 + lighting / 2 } else { 120 + lighting }
        })
    }

    /// Every combination of algorithm, blur and morphology switches
    fn all_configs() -> Vec<BinarizeConfig> {
        let mut configs = Vec::new();
        for algorithm in Algorithm::iter() {
            for blur in [0, 1, 3, 5] {
                for median in [false, true] {
                    for (opening, closing) in [(false, false), (true, false), (false, true), (true, true)] {
                        configs.push(
                            BinarizeConfig::builder()
                                .algorithm(algorithm)
                                .threshold(97)
                                .block_size(7)
                                .blur_kernel_size(blur)
                                .use_median_blur(median)
                                .morphological_opening(opening)
                                .morphological_closing(closing)
                                .build()
                                .unwrap(),
                        );
                    }
                }
            }
        }
        configs
    }

    #[test]
    fn every_config_yields_binary_output_of_same_size() {
        let raster = sample_raster();
        for config in all_configs() {
            let binary = binarize_raster(raster.clone(), &config).unwrap();
            assert_eq!(binary.dimensions(), (37, 23), "{config:?}");
            assert!(is_binary(&binary), "{config:?}");
        }
    }

    #[test]
    fn global_checkerboard_is_reproduced() {
        let board = Raster::from_fn(4, 4, |x, y| if (x + y) % 2 == 0 { 0 } else { 255 });
        let config = BinarizeConfig::builder()
            .algorithm(Algorithm::Global)
            .threshold(128)
            .build()
            .unwrap();
        let binary = binarize_raster(board.clone(), &config).unwrap();
        assert_eq!(binary.as_raster(), &board);
    }

    #[test]
    fn uniform_image_under_otsu_is_all_white() {
        let raster = Raster::filled(16, 16, 100);
        assert_eq!(otsu_threshold(&raster), 0);
        let binary = binarize_raster(raster, &BinarizeConfig::default()).unwrap();
        assert_eq!(binary.white_count(), 256);
    }

    #[test]
    fn otsu_reproduces_half_split() {
        let raster = Raster::from_fn(8, 8, |x, _| if x < 4 { 0 } else { 255 });
        assert_eq!(otsu_threshold(&raster), 0);
        let binary = binarize_raster(raster.clone(), &BinarizeConfig::default()).unwrap();
        assert_eq!(binary.as_raster(), &raster);
    }

    #[test]
    fn binarizing_binary_output_is_idempotent() {
        let raster = sample_raster();
        for algorithm in [Algorithm::Global, Algorithm::Otsu] {
            let config = BinarizeConfig::builder().algorithm(algorithm).build().unwrap();
            let once = binarize_raster(raster.clone(), &config).unwrap();
            let twice = binarize_raster(once.clone().into_raster(), &config).unwrap();
            assert_eq!(once, twice, "{algorithm}");
        }
    }

    #[test]
    fn adaptive_gaussian_matches_adaptive_mean() {
        let raster = sample_raster();
        let mean = BinarizeConfig::builder()
            .algorithm(Algorithm::AdaptiveMean)
            .build()
            .unwrap();
        let gaussian = BinarizeConfig::builder()
            .algorithm(Algorithm::AdaptiveGaussian)
            .build()
            .unwrap();
        assert_eq!(
            binarize_raster(raster.clone(), &mean).unwrap(),
            binarize_raster(raster, &gaussian).unwrap()
        );
    }

    #[test]
    fn color_and_gray_inputs_agree() {
        let gray = GrayImage::from_fn(10, 6, |x, y| Luma([(x * 25 + y) as u8]));
        let rgb = RgbImage::from_fn(10, 6, |x, y| {
            let v = (x * 25 + y) as u8;
            Rgb([v, v, v])
        });
        let config = BinarizeConfig::default();
        let from_gray = binarize(DynamicImage::ImageLuma8(gray), &config).unwrap();
        let from_rgb = binarize(DynamicImage::ImageRgb8(rgb), &config).unwrap();
        assert_eq!(from_gray, from_rgb);
    }

    #[test]
    fn results_are_deterministic_across_threads() {
        let raster = sample_raster();
        let config = BinarizeConfig::for_uneven_lighting();
        let pipeline = Pipeline::from_config(&config).unwrap();
        let expected = pipeline.process(raster.clone());

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| pipeline.process(raster.clone())))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.png");
        let output = dir.path().join("page_binary.png");

        sample_raster().into_gray_image().save(&input).unwrap();
        binarize_to_file(&input, &output, &BinarizeConfig::for_ocr()).unwrap();

        let written = load_image(&output).unwrap().to_luma8();
        assert_eq!(written.dimensions(), (37, 23));
        assert!(written.as_raw().iter().all(|&v| v == BLACK || v == WHITE));

        let direct = binarize_file(&input, &BinarizeConfig::for_ocr()).unwrap();
        assert_eq!(written.as_raw().as_slice(), direct.as_slice());
    }

    #[test]
    fn missing_input_fails_without_writing_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.png");
        let result = binarize_to_file(dir.path().join("missing.png"), &output, &BinarizeConfig::default());
        assert!(result.is_err());
        assert!(!output.exists());
    }
}
