use crate::{
    algorithms::{
        morphology::{ClosingPostprocessor, OpeningPostprocessor},
        preprocessing::{GaussianBlurPreprocessor, MedianBlurPreprocessor},
    },
    binarizer::Binarizer,
    pipeline::Pipeline,
    traits::{Postprocessor, Preprocessor},
};

/// Builder for creating processing pipelines with a fluent API
pub struct PipelineBuilder {
    preprocessors: Vec<Box<dyn Preprocessor>>,
    binarizer: Option<Binarizer>,
    postprocessors: Vec<Box<dyn Postprocessor>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            preprocessors: Vec::new(),
            binarizer: None,
            postprocessors: Vec::new(),
        }
    }

    /// Add a preprocessor to the pipeline
    pub fn add_preprocessor<P>(mut self, preprocessor: P) -> Self
    where
        P: Preprocessor + 'static,
    {
        self.preprocessors.push(Box::new(preprocessor));
        self
    }

    /// Set the threshold strategy (replaces any existing one)
    pub fn set_binarizer(mut self, binarizer: Binarizer) -> Self {
        self.binarizer = Some(binarizer);
        self
    }

    /// Add a post-processor to the pipeline
    pub fn add_postprocessor<P>(mut self, postprocessor: P) -> Self
    where
        P: Postprocessor + 'static,
    {
        self.postprocessors.push(Box::new(postprocessor));
        self
    }

    pub fn with_gaussian_blur(self, kernel_size: u32) -> Self {
        self.add_preprocessor(GaussianBlurPreprocessor { kernel_size })
    }

    pub fn with_median_blur(self, kernel_size: u32) -> Self {
        self.add_preprocessor(MedianBlurPreprocessor { kernel_size })
    }

    /// Add morphological opening as a post-processing step
    pub fn with_opening(self, kernel_size: u32) -> Self {
        self.add_postprocessor(OpeningPostprocessor { kernel_size })
    }

    /// Add morphological closing as a post-processing step
    pub fn with_closing(self, kernel_size: u32) -> Self {
        self.add_postprocessor(ClosingPostprocessor { kernel_size })
    }

    /// Build the pipeline, thresholding with Otsu if no strategy was set
    pub fn build(self) -> Pipeline {
        Pipeline::new(
            self.preprocessors,
            self.binarizer.unwrap_or_default(),
            self.postprocessors,
        )
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
