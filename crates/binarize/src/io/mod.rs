use std::path::Path;

use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::{
    error::{BinarizeError, Result},
    types::BinaryRaster,
};

/// Decode an image file; the format is guessed from its contents
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    let image = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?;
    debug!(path = %path.display(), width = image.width(), height = image.height(), "Loaded image");
    Ok(image)
}

/// Write a binary raster as an 8-bit grayscale image.
///
/// The format follows the output extension; unknown or missing extensions
/// fall back to PNG.
pub fn save_binary<P: AsRef<Path>>(binary: &BinaryRaster, path: P) -> Result<()> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
    binary
        .clone()
        .into_gray_image()
        .save_with_format(path, format)
        .map_err(BinarizeError::ImageSave)?;
    debug!(path = %path.display(), ?format, "Saved binary image");
    Ok(())
}
