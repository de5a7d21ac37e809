use crate::types::{BinaryRaster, Raster};

/// Stage applied to the grayscale raster before thresholding (e.g. blur)
pub trait Preprocessor: Send + Sync {
    fn preprocess(&self, raster: Raster) -> Raster;

    /// Short human-readable stage name
    fn name(&self) -> String;
}

/// Stage applied to the thresholded raster (e.g. morphological cleanup)
pub trait Postprocessor: Send + Sync {
    fn postprocess(&self, binary: BinaryRaster) -> BinaryRaster;

    /// Short human-readable stage name
    fn name(&self) -> String;
}
