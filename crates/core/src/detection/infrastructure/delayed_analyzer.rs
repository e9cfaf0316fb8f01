use std::time::Duration;

use crate::detection::domain::expression::ExpressionScores;
use crate::detection::domain::face_analyzer::{AnalysisError, Detection, FaceAnalyzer};
use crate::shared::raster_image::RasterImage;
use crate::shared::region::Region;

/// Decorator that holds each detection result back for a fixed time.
///
/// Lets a scanning screen stay visible. Results are never altered.
pub struct DelayedAnalyzer {
    inner: Box<dyn FaceAnalyzer>,
    delay: Duration,
}

impl DelayedAnalyzer {
    pub fn new(inner: Box<dyn FaceAnalyzer>, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

impl FaceAnalyzer for DelayedAnalyzer {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn detect_regions(&self, image: &RasterImage) -> Result<Vec<Region>, AnalysisError> {
        let result = self.inner.detect_regions(image);
        std::thread::sleep(self.delay);
        result
    }

    fn detect_attributed(&self, image: &RasterImage) -> Result<Detection, AnalysisError> {
        let result = self.inner.detect_attributed(image);
        std::thread::sleep(self.delay);
        result
    }

    fn classify_expressions(&self, image: &RasterImage) -> Result<ExpressionScores, AnalysisError> {
        self.inner.classify_expressions(image)
    }
}
