use ndarray::{s, ArrayView3, Axis};

use crate::detection::domain::skin_tone::is_skin_tone;
use crate::shared::region::Region;

/// Tiles an image into square blocks and emits one candidate region per
/// block dense enough in skin-tone pixels.
///
/// A block qualifies only when both its skin ratio and its absolute skin
/// count clear their thresholds; the count keeps tiny blocks from passing
/// on ratio alone.
#[derive(Clone, Debug)]
pub struct BlockScanner {
    block_size: u32,
    min_skin_ratio: f64,
    min_skin_pixels: u32,
}

impl BlockScanner {
    pub fn new(block_size: u32, min_skin_ratio: f64, min_skin_pixels: u32) -> Self {
        Self {
            block_size,
            min_skin_ratio,
            min_skin_pixels,
        }
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Scans `(height, width, channels)` pixels in row-major block order.
    ///
    /// The scan advances while `origin + block_size < dimension`, so a
    /// trailing block that would reach the image edge is never visited.
    pub fn scan(&self, pixels: &ArrayView3<'_, u8>) -> Vec<Region> {
        let (height, width, channels) = pixels.dim();
        let bs = self.block_size as usize;
        if bs == 0 || channels < 3 {
            return Vec::new();
        }

        let mut candidates = Vec::new();
        let mut y = 0;
        while y + bs < height {
            let mut x = 0;
            while x + bs < width {
                let block = pixels.slice(s![y..y + bs, x..x + bs, ..]);
                let skin = count_skin_pixels(&block);
                let ratio = skin as f64 / (bs * bs) as f64;
                if ratio > self.min_skin_ratio && skin > self.min_skin_pixels as usize {
                    candidates.push(Region::new(
                        x as i32,
                        y as i32,
                        bs as i32,
                        bs as i32,
                        ratio,
                    ));
                }
                x += bs;
            }
            y += bs;
        }

        log::debug!(
            "Block scan: {} candidate(s) of {bs}px in {width}x{height}",
            candidates.len()
        );
        candidates
    }
}

fn count_skin_pixels(block: &ArrayView3<'_, u8>) -> usize {
    block
        .lanes(Axis(2))
        .into_iter()
        .filter(|px| is_skin_tone(px[0], px[1], px[2]))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::raster_image::RasterImage;
    use approx::assert_relative_eq;

    const SKIN: [u8; 3] = [180, 120, 90];
    const BACKGROUND: [u8; 3] = [30, 60, 160];

    fn scanner() -> BlockScanner {
        BlockScanner::new(50, 0.3, 100)
    }

    fn scan(image: &RasterImage) -> Vec<Region> {
        scanner().scan(&image.as_ndarray().unwrap())
    }

    #[test]
    fn test_uniform_background_has_no_candidates() {
        let image = RasterImage::filled(200, 200, BACKGROUND);
        assert!(scan(&image).is_empty());
    }

    #[test]
    fn test_all_skin_yields_every_full_block() {
        // 160x110: x origins 0,50,100 ; y origins 0,50
        let image = RasterImage::filled(160, 110, SKIN);
        let regions = scan(&image);
        assert_eq!(regions.len(), 6);
        assert!(regions.iter().all(|r| r.width == 50 && r.height == 50));
        assert_relative_eq!(regions[0].confidence, 1.0);
    }

    #[test]
    fn test_candidates_are_row_major() {
        let image = RasterImage::filled(160, 110, SKIN);
        let origins: Vec<(i32, i32)> = scan(&image).iter().map(|r| (r.x, r.y)).collect();
        assert_eq!(
            origins,
            vec![(0, 0), (50, 0), (100, 0), (0, 50), (50, 50), (100, 50)]
        );
    }

    #[test]
    fn test_block_reaching_the_edge_is_skipped() {
        // Exactly 100 wide: the block at x=50 would end on the edge.
        let image = RasterImage::filled(100, 100, SKIN);
        let regions = scan(&image);
        assert_eq!(regions.len(), 1);
        assert_eq!((regions[0].x, regions[0].y), (0, 0));
    }

    #[test]
    fn test_image_smaller_than_block_is_empty() {
        let image = RasterImage::filled(40, 40, SKIN);
        assert!(scan(&image).is_empty());
    }

    #[test]
    fn test_ratio_threshold_is_exclusive() {
        // 30% of a 50x50 block = 750 px: 15 full rows of skin.
        let mut image = RasterImage::filled(60, 60, BACKGROUND);
        image.fill_rect(0, 0, 50, 15, SKIN);
        assert!(scan(&image).is_empty());

        image.fill_rect(0, 15, 1, 1, SKIN);
        let regions = scan(&image);
        assert_eq!(regions.len(), 1);
        assert_relative_eq!(regions[0].confidence, 751.0 / 2500.0);
    }

    #[test]
    fn test_pixel_count_threshold_is_exclusive() {
        // 20x20 blocks (400 px) with a low ratio bar: only the count matters.
        let scanner = BlockScanner::new(20, 0.2, 100);
        let mut image = RasterImage::filled(30, 30, BACKGROUND);
        image.fill_rect(0, 0, 20, 5, SKIN); // 100 px, ratio 0.25
        assert!(scanner.scan(&image.as_ndarray().unwrap()).is_empty());

        image.fill_rect(0, 5, 1, 1, SKIN); // 101 px
        assert_eq!(scanner.scan(&image.as_ndarray().unwrap()).len(), 1);
    }

    #[test]
    fn test_rgb_input_is_supported() {
        let data: Vec<u8> = std::iter::repeat(SKIN).take(60 * 60).flatten().collect();
        let image = RasterImage::new(data, 60, 60, 3);
        assert_eq!(scan(&image).len(), 1);
    }

    #[test]
    fn test_zero_block_size_is_empty() {
        let image = RasterImage::filled(60, 60, SKIN);
        let scanner = BlockScanner::new(0, 0.3, 100);
        assert!(scanner.scan(&image.as_ndarray().unwrap()).is_empty());
    }
}
