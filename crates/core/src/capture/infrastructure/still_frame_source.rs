use std::path::PathBuf;

use crate::capture::domain::frame_source::FrameSource;
use crate::capture::domain::image_reader::ImageReader;
use crate::shared::raster_image::RasterImage;

/// Plays a list of image files back as camera frames, one per grab,
/// wrapping around at the end.
pub struct StillFrameSource {
    paths: Vec<PathBuf>,
    reader: Box<dyn ImageReader>,
    cursor: usize,
    open: bool,
}

impl StillFrameSource {
    pub fn new(paths: Vec<PathBuf>, reader: Box<dyn ImageReader>) -> Self {
        Self {
            paths,
            reader,
            cursor: 0,
            open: false,
        }
    }

    /// Path the next grab will read, if any.
    pub fn next_path(&self) -> Option<&PathBuf> {
        if self.paths.is_empty() {
            None
        } else {
            self.paths.get(self.cursor % self.paths.len())
        }
    }
}

impl FrameSource for StillFrameSource {
    fn open(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.paths.is_empty() {
            return Err("no frames to play back".into());
        }
        if let Some(missing) = self.paths.iter().find(|p| !p.exists()) {
            return Err(format!("frame file not found: {}", missing.display()).into());
        }
        self.open = true;
        Ok(())
    }

    fn grab_frame(&mut self) -> Result<RasterImage, Box<dyn std::error::Error>> {
        if !self.open {
            return Err("StillFrameSource: not opened".into());
        }
        let path = self.next_path().ok_or("no frames to play back")?.clone();
        self.cursor += 1;
        self.reader.read(&path)
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
