use std::path::Path;

use crate::shared::raster_image::RasterImage;

/// Decodes an image file into RGBA pixels.
pub trait ImageReader: Send {
    fn read(&self, path: &Path) -> Result<RasterImage, Box<dyn std::error::Error>>;
}
