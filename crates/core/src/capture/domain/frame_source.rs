use crate::shared::raster_image::RasterImage;

/// A camera-like source of still frames.
///
/// The session opens the source when the user starts the camera and must
/// close it on every exit path; `close` is idempotent.
pub trait FrameSource: Send {
    /// Acquires the device. Fails when access is denied or no device exists.
    fn open(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Grabs the current frame. Only valid while open.
    fn grab_frame(&mut self) -> Result<RasterImage, Box<dyn std::error::Error>>;

    /// Releases the device.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}
