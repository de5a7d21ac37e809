pub mod builder;

use image::DynamicImage;
use tracing::debug;

use crate::{
    algorithms::{
        grayscale::to_grayscale,
        morphology::{ClosingPostprocessor, OpeningPostprocessor},
        preprocessing::{GaussianBlurPreprocessor, MedianBlurPreprocessor},
    },
    binarizer::Binarizer,
    config::BinarizeConfig,
    error::Result,
    traits::{Postprocessor, Preprocessor},
    types::{BinaryRaster, Raster},
};

/// Grayscale raster in, binary raster out: preprocessors, one threshold
/// strategy, then postprocessors, each applied in insertion order.
pub struct Pipeline {
    preprocessors: Vec<Box<dyn Preprocessor>>,
    binarizer: Binarizer,
    postprocessors: Vec<Box<dyn Postprocessor>>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    pub fn new(
        preprocessors: Vec<Box<dyn Preprocessor>>,
        binarizer: Binarizer,
        postprocessors: Vec<Box<dyn Postprocessor>>,
    ) -> Self {
        Self {
            preprocessors,
            binarizer,
            postprocessors,
        }
    }

    /// Assemble the stage sequence a configuration describes.
    ///
    /// Blur runs only for a non-zero kernel size, median taking precedence
    /// over Gaussian. Opening always runs before closing.
    pub fn from_config(config: &BinarizeConfig) -> Result<Self> {
        let mut builder = Self::builder().set_binarizer(Binarizer::from_config(config)?);

        let blur = config.blur_kernel_size();
        if blur > 0 {
            builder = if config.use_median_blur() {
                builder.add_preprocessor(MedianBlurPreprocessor { kernel_size: blur })
            } else {
                builder.add_preprocessor(GaussianBlurPreprocessor { kernel_size: blur })
            };
        }

        let morph = config.morph_kernel_size();
        if config.use_morphological_opening() {
            builder = builder.add_postprocessor(OpeningPostprocessor { kernel_size: morph });
        }
        if config.use_morphological_closing() {
            builder = builder.add_postprocessor(ClosingPostprocessor { kernel_size: morph });
        }

        Ok(builder.build())
    }

    /// Run every stage on a grayscale raster
    pub fn process(&self, raster: Raster) -> BinaryRaster {
        let (width, height) = raster.dimensions();
        debug!(width, height, pipeline = %self.info(), "Binarizing");

        let processed = self.preprocess(raster);
        let mut binary = self.binarizer.threshold(&processed);
        debug!(stage = self.binarizer.name(), "Applied threshold");

        for postprocessor in &self.postprocessors {
            binary = postprocessor.postprocess(binary);
            debug!(stage = %postprocessor.name(), "Applied postprocessor");
        }

        binary
    }

    /// Convert an image of any pixel format to grayscale, then run every stage
    pub fn process_image(&self, image: DynamicImage) -> BinaryRaster {
        self.process(to_grayscale(image))
    }

    /// Run only the stages before thresholding. Useful for inspecting what
    /// the threshold strategy sees, e.g. to report the Otsu level.
    pub fn preprocess(&self, raster: Raster) -> Raster {
        self.preprocessors.iter().fold(raster, |current, preprocessor| {
            let next = preprocessor.preprocess(current);
            debug!(stage = %preprocessor.name(), "Applied preprocessor");
            next
        })
    }

    pub fn binarizer(&self) -> &Binarizer {
        &self.binarizer
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        let names = self
            .preprocessors
            .iter()
            .map(|p| p.name())
            .chain(std::iter::once(self.binarizer.name().to_string()))
            .chain(self.postprocessors.iter().map(|p| p.name()))
            .collect::<Vec<_>>();

        format!("Pipeline: {}", names.join(" -> "))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::builder().build()
    }
}
