use image::DynamicImage;

use crate::types::Raster;

/// Reduce an image to a single channel of 8-bit luminance samples.
///
/// 8-bit grayscale input is moved into the raster as-is. Other formats go
/// through `image`'s luminance conversion.
pub fn to_grayscale(image: DynamicImage) -> Raster {
    match image {
        DynamicImage::ImageLuma8(gray) => Raster::from(gray),
        other => Raster::from(other.to_luma8()),
    }
}
