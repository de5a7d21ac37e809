use tracing::debug;

use crate::{
    algorithms::threshold::{adaptive_mean, global_threshold, otsu},
    config::{Algorithm, Backend, BinarizeConfig},
    error::Result,
    types::{BinaryRaster, Raster},
};

#[cfg(feature = "imageproc-backend")]
use crate::algorithms::imageproc_backend::ImageprocThreshold;

/// A resolved threshold strategy
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Binarizer {
    /// White where the sample is at least `threshold`
    Global { threshold: u8 },
    /// Histogram-derived global threshold
    #[default]
    Otsu,
    /// Local mean over a `block_size` window, biased by `c`
    AdaptiveMean { block_size: u32, c: f64 },
    #[cfg(feature = "imageproc-backend")]
    Imageproc(ImageprocThreshold),
}

impl Binarizer {
    /// Pick the strategy a configuration asks for.
    ///
    /// Fails with [`UnsupportedAlgorithm`](crate::BinarizeError::UnsupportedAlgorithm)
    /// when the requested backend was not compiled in.
    pub fn from_config(config: &BinarizeConfig) -> Result<Self> {
        let algorithm = config.algorithm();
        if algorithm.is_approximated() {
            debug!(
                requested = %algorithm,
                using = %algorithm.resolved(),
                "AdaptiveGaussian is approximated by AdaptiveMean"
            );
        }

        match config.backend() {
            Backend::Builtin => Ok(match algorithm.resolved() {
                Algorithm::Global => Self::Global {
                    threshold: config.threshold(),
                },
                Algorithm::AdaptiveMean | Algorithm::AdaptiveGaussian => Self::AdaptiveMean {
                    block_size: config.block_size(),
                    c: config.c(),
                },
                Algorithm::Otsu => Self::Otsu,
            }),
            Backend::Imageproc => Self::imageproc(config),
        }
    }

    #[cfg(feature = "imageproc-backend")]
    fn imageproc(config: &BinarizeConfig) -> Result<Self> {
        Ok(Self::Imageproc(ImageprocThreshold {
            algorithm: config.algorithm(),
            threshold: config.threshold(),
            block_size: config.block_size(),
            c: config.c(),
        }))
    }

    #[cfg(not(feature = "imageproc-backend"))]
    fn imageproc(config: &BinarizeConfig) -> Result<Self> {
        Err(crate::error::BinarizeError::UnsupportedAlgorithm(format!(
            "{} on the imageproc backend (build with the `imageproc-backend` feature)",
            config.algorithm()
        )))
    }

    /// Strategy name used in logs and pipeline descriptions
    pub fn name(&self) -> &'static str {
        match self {
            Self::Global { .. } => "Global",
            Self::Otsu => "Otsu",
            Self::AdaptiveMean { .. } => "AdaptiveMean",
            #[cfg(feature = "imageproc-backend")]
            Self::Imageproc(_) => "Imageproc",
        }
    }

    /// Classify every sample of a grayscale raster as black or white
    pub fn threshold(&self, raster: &Raster) -> BinaryRaster {
        match self {
            Self::Global { threshold } => global_threshold(raster, *threshold),
            Self::Otsu => {
                let (level, binary) = otsu(raster);
                debug!(level, "Otsu threshold");
                binary
            }
            Self::AdaptiveMean { block_size, c } => adaptive_mean(raster, *block_size, *c),
            #[cfg(feature = "imageproc-backend")]
            Self::Imageproc(stage) => stage.apply(raster),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_selects_otsu() {
        let binarizer = Binarizer::from_config(&BinarizeConfig::default()).unwrap();
        assert_eq!(binarizer, Binarizer::Otsu);
        assert_eq!(binarizer.name(), "Otsu");
        assert_eq!(Binarizer::default(), Binarizer::Otsu);
    }

    #[test]
    fn global_carries_threshold() {
        let config = BinarizeConfig::builder()
            .algorithm(Algorithm::Global)
            .threshold(42)
            .build()
            .unwrap();
        let binarizer = Binarizer::from_config(&config).unwrap();
        assert_eq!(binarizer, Binarizer::Global { threshold: 42 });
        assert_eq!(binarizer.name(), "Global");
    }

    #[test]
    fn adaptive_gaussian_resolves_to_adaptive_mean() {
        let config = BinarizeConfig::builder()
            .algorithm(Algorithm::AdaptiveGaussian)
            .block_size(15)
            .c(4.0)
            .build()
            .unwrap();
        let binarizer = Binarizer::from_config(&config).unwrap();
        assert_eq!(
            binarizer,
            Binarizer::AdaptiveMean {
                block_size: 15,
                c: 4.0
            }
        );
        assert_eq!(binarizer.name(), "AdaptiveMean");
    }

    #[test]
    fn threshold_delegates_to_strategy() {
        let raster = Raster::from_fn(12, 12, |x, y| ((x * 20 + y * 3) % 256) as u8);

        let global = Binarizer::Global { threshold: 100 };
        assert_eq!(global.threshold(&raster), global_threshold(&raster, 100));

        assert_eq!(Binarizer::Otsu.threshold(&raster), otsu(&raster).1);

        let adaptive = Binarizer::AdaptiveMean {
            block_size: 5,
            c: 1.5,
        };
        assert_eq!(adaptive.threshold(&raster), adaptive_mean(&raster, 5, 1.5));
    }

    #[cfg(not(feature = "imageproc-backend"))]
    #[test]
    fn missing_backend_is_unsupported() {
        use crate::error::BinarizeError;

        let config = BinarizeConfig::builder()
            .backend(Backend::Imageproc)
            .build()
            .unwrap();
        let err = Binarizer::from_config(&config).unwrap_err();
        assert!(matches!(err, BinarizeError::UnsupportedAlgorithm(_)));
        assert!(err.to_string().contains("imageproc"));
    }

    #[cfg(feature = "imageproc-backend")]
    #[test]
    fn imageproc_backend_is_selected() {
        let config = BinarizeConfig::builder()
            .backend(Backend::Imageproc)
            .build()
            .unwrap();
        let binarizer = Binarizer::from_config(&config).unwrap();
        assert_eq!(binarizer.name(), "Imageproc");
    }

    #[cfg(feature = "imageproc-backend")]
    #[test]
    fn imageproc_adaptive_honours_bias_and_single_pixel_window() {
        let flat = Raster::filled(10, 10, 90);
        for (block_size, c) in [(11, -1.0), (1, -1.0), (1, 2.0)] {
            let config = BinarizeConfig::builder()
                .algorithm(Algorithm::AdaptiveMean)
                .block_size(block_size)
                .c(c)
                .backend(Backend::Imageproc)
                .build()
                .unwrap();
            let binarizer = Binarizer::from_config(&config).unwrap();
            assert_eq!(
                binarizer.threshold(&flat),
                adaptive_mean(&flat, block_size, c),
                "block_size={block_size} c={c}"
            );
        }
    }
}
