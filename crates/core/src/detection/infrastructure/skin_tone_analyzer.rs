use crate::detection::domain::block_scanner::BlockScanner;
use crate::detection::domain::face_analyzer::{AnalysisError, FaceAnalyzer};
use crate::detection::domain::region_filter::RegionFilter;
use crate::detection::domain::region_merger::RegionMerger;
use crate::shared::raster_image::RasterImage;
use crate::shared::region::Region;
use crate::shared::settings::DetectorSettings;

pub const SKIN_TONE_ANALYZER_NAME: &str = "skin-tone heuristic";

/// Pixel-heuristic face detector: block scan → merge → filter.
///
/// Pure over its input. It never reports an error; an image it cannot
/// interpret yields no regions, which callers present as "no face".
#[derive(Clone, Debug)]
pub struct SkinToneAnalyzer {
    scanner: BlockScanner,
    merger: RegionMerger,
    filter: RegionFilter,
}

impl SkinToneAnalyzer {
    pub fn new(scanner: BlockScanner, merger: RegionMerger, filter: RegionFilter) -> Self {
        Self {
            scanner,
            merger,
            filter,
        }
    }

    pub fn from_settings(settings: &DetectorSettings) -> Self {
        Self::new(
            BlockScanner::new(
                settings.block_size,
                settings.min_skin_ratio,
                settings.min_skin_pixels,
            ),
            RegionMerger::new(settings.merge_strategy),
            RegionFilter::new(settings.min_confidence, settings.min_area),
        )
    }

    pub fn detect(&self, image: &RasterImage) -> Vec<Region> {
        if image.channels() < 3 {
            log::warn!(
                "Skin-tone analysis needs RGB data, got {} channel(s)",
                image.channels()
            );
            return Vec::new();
        }
        let pixels = match image.as_ndarray() {
            Ok(pixels) => pixels,
            Err(e) => {
                log::warn!(
                    "Pixel buffer does not match {}x{}x{}: {e}",
                    image.width(),
                    image.height(),
                    image.channels()
                );
                return Vec::new();
            }
        };

        let candidates = self.scanner.scan(&pixels);
        let merged = self.merger.merge(&candidates);
        let faces = self.filter.apply(&merged);
        log::debug!(
            "Skin-tone analysis: {} candidate block(s), {} merged, {} accepted",
            candidates.len(),
            merged.len(),
            faces.len()
        );
        faces
    }
}

impl Default for SkinToneAnalyzer {
    fn default() -> Self {
        Self::from_settings(&DetectorSettings::default())
    }
}

impl FaceAnalyzer for SkinToneAnalyzer {
    fn name(&self) -> &str {
        SKIN_TONE_ANALYZER_NAME
    }

    fn detect_regions(&self, image: &RasterImage) -> Result<Vec<Region>, AnalysisError> {
        Ok(self.detect(image))
    }
}
