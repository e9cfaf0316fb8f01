use std::path::Path;

use crate::capture::domain::image_reader::ImageReader;
use crate::shared::raster_image::RasterImage;

/// Decodes image files with the `image` crate, normalizing every format to
/// 8-bit RGBA so detection sees the same layout as a canvas capture.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<RasterImage, Box<dyn std::error::Error>> {
        let rgba = image::open(path)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("Decoded {} ({width}x{height})", path.display());
        Ok(RasterImage::try_new(rgba.into_raw(), width, height, 4)?)
    }
}
