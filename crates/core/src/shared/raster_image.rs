use ndarray::{ArrayView3, ErrorKind, ShapeError};

/// A captured still: row-major pixel bytes, 4 channels (RGBA) or 3 (RGB).
///
/// Detection only reads the first three channels; alpha is ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl RasterImage {
    /// Wraps a pixel buffer without checking its length; a mismatch
    /// surfaces later from `as_ndarray`. Use `try_new` to reject it up front.
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Self {
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    pub fn try_new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
    ) -> Result<Self, ShapeError> {
        let expected = (width as usize) * (height as usize) * (channels as usize);
        if data.len() != expected {
            return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape));
        }
        Ok(Self::new(data, width, height, channels))
    }

    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self::new(data, width, height, 4)
    }

    /// Image filled with a single opaque RGB color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixels * 4);
        for _ in 0..pixels {
            data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        Self::from_rgba(data, width, height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// `(height, width, channels)` view over the pixel buffer.
    ///
    /// Fails when the buffer does not match the declared dimensions.
    pub fn as_ndarray(&self) -> Result<ArrayView3<'_, u8>, ShapeError> {
        ArrayView3::from_shape(self.shape(), &self.data)
    }

    /// Overwrites the RGB channels of a rectangle, clipped to the image.
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, rgb: [u8; 3]) {
        let channels = self.channels as usize;
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for row in y..y_end {
            for col in x..x_end {
                let idx = (row as usize * self.width as usize + col as usize) * channels;
                if let Some(pixel) = self.data.get_mut(idx..idx + 3) {
                    pixel.copy_from_slice(&rgb);
                }
            }
        }
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 16]; // 2x2x4
        let image = RasterImage::from_rgba(data.clone(), 2, 2);
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);
        assert_eq!(image.channels(), 4);
        assert_eq!(image.data(), &data[..]);
    }

    #[test]
    fn test_try_new_rejects_mismatched_length() {
        assert!(RasterImage::try_new(vec![0u8; 10], 2, 2, 4).is_err());
        assert!(RasterImage::try_new(vec![0u8; 16], 2, 2, 4).is_ok());
    }

    #[test]
    fn test_mismatched_buffer_fails_ndarray_view() {
        let image = RasterImage::new(vec![0u8; 10], 2, 2, 4);
        assert!(image.as_ndarray().is_err());
    }

    #[test]
    fn test_filled_is_opaque() {
        let image = RasterImage::filled(3, 2, [10, 20, 30]);
        assert_eq!(image.data().len(), 24);
        assert_eq!(&image.data()[..4], &[10, 20, 30, 255]);
        assert_eq!(&image.data()[20..], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_as_ndarray_shape() {
        let image = RasterImage::filled(4, 2, [0, 0, 0]);
        let arr = image.as_ndarray().unwrap();
        assert_eq!(arr.shape(), &[2, 4, 4]); // (height, width, channels)
    }

    #[test]
    fn test_as_ndarray_pixel_access() {
        // 2x2 RGB: pixel (row=1, col=0) red
        let mut data = vec![0u8; 12];
        data[6] = 255;
        let image = RasterImage::new(data, 2, 2, 3);
        let arr = image.as_ndarray().unwrap();
        assert_eq!(arr[[1, 0, 0]], 255);
        assert_eq!(arr[[1, 0, 1]], 0);
        assert_eq!(arr[[1, 0, 2]], 0);
    }

    #[test]
    fn test_fill_rect_paints_inside_only() {
        let mut image = RasterImage::filled(4, 4, [0, 0, 0]);
        image.fill_rect(1, 1, 2, 2, [200, 100, 50]);
        let arr = image.as_ndarray().unwrap();
        assert_eq!(arr[[1, 1, 0]], 200);
        assert_eq!(arr[[2, 2, 2]], 50);
        assert_eq!(arr[[0, 0, 0]], 0);
        assert_eq!(arr[[3, 3, 0]], 0);
        // alpha untouched
        assert_eq!(arr[[1, 1, 3]], 255);
    }

    #[test]
    fn test_fill_rect_clips_at_edges() {
        let mut image = RasterImage::filled(3, 3, [0, 0, 0]);
        image.fill_rect(2, 2, 10, 10, [9, 9, 9]);
        let arr = image.as_ndarray().unwrap();
        assert_eq!(arr[[2, 2, 0]], 9);
        assert_eq!(arr[[1, 1, 0]], 0);
    }
}
