use crate::detection::domain::expression::ExpressionScores;
use crate::detection::domain::face_analyzer::{AnalysisError, Detection, FaceAnalyzer};
use crate::detection::infrastructure::skin_tone_analyzer::SkinToneAnalyzer;
use crate::shared::raster_image::RasterImage;
use crate::shared::region::Region;

/// Decorator that prefers a primary analyzer and falls back to the
/// skin-tone heuristic whenever the primary fails to detect.
///
/// Expression classification has no fallback: the primary's answer,
/// including its error, is returned as is.
pub struct FallbackAnalyzer {
    primary: Box<dyn FaceAnalyzer>,
    fallback: SkinToneAnalyzer,
}

impl FallbackAnalyzer {
    pub fn new(primary: Box<dyn FaceAnalyzer>, fallback: SkinToneAnalyzer) -> Self {
        Self { primary, fallback }
    }
}

impl FaceAnalyzer for FallbackAnalyzer {
    fn name(&self) -> &str {
        self.primary.name()
    }

    fn detect_regions(&self, image: &RasterImage) -> Result<Vec<Region>, AnalysisError> {
        self.detect_attributed(image).map(|detection| detection.regions)
    }

    fn detect_attributed(&self, image: &RasterImage) -> Result<Detection, AnalysisError> {
        match self.primary.detect_attributed(image) {
            Ok(detection) => Ok(detection),
            Err(e) => {
                log::warn!("{e}; using {} instead", self.fallback.name());
                Ok(Detection {
                    analyzer: self.fallback.name().to_string(),
                    regions: self.fallback.detect(image),
                })
            }
        }
    }

    fn classify_expressions(&self, image: &RasterImage) -> Result<ExpressionScores, AnalysisError> {
        self.primary.classify_expressions(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::infrastructure::skin_tone_analyzer::SKIN_TONE_ANALYZER_NAME;

    struct StubAnalyzer {
        result: Result<Vec<Region>, AnalysisError>,
    }

    impl FaceAnalyzer for StubAnalyzer {
        fn name(&self) -> &str {
            "stub"
        }

        fn detect_regions(&self, _image: &RasterImage) -> Result<Vec<Region>, AnalysisError> {
            self.result.clone()
        }

        fn classify_expressions(
            &self,
            _image: &RasterImage,
        ) -> Result<ExpressionScores, AnalysisError> {
            Ok([("happy", 0.9)].into_iter().collect())
        }
    }

    fn skin_image() -> RasterImage {
        let mut image = RasterImage::filled(200, 200, [30, 60, 160]);
        image.fill_rect(50, 50, 100, 100, [150, 100, 80]);
        image
    }

    fn failing() -> StubAnalyzer {
        StubAnalyzer {
            result: Err(AnalysisError::Backend {
                analyzer: "stub".into(),
                reason: "not supported on this device".into(),
            }),
        }
    }

    #[test]
    fn test_primary_result_is_used_when_it_succeeds() {
        let primary = StubAnalyzer {
            result: Ok(vec![Region::new(1, 2, 3, 4, 0.9), Region::new(5, 6, 7, 8, 0.8)]),
        };
        let analyzer = FallbackAnalyzer::new(Box::new(primary), SkinToneAnalyzer::default());
        let regions = analyzer.detect_regions(&skin_image()).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].x, 1);
    }

    #[test]
    fn test_primary_empty_result_is_not_overridden() {
        let primary = StubAnalyzer { result: Ok(vec![]) };
        let analyzer = FallbackAnalyzer::new(Box::new(primary), SkinToneAnalyzer::default());
        assert!(analyzer.detect_regions(&skin_image()).unwrap().is_empty());
    }

    #[test]
    fn test_primary_failure_falls_back_to_heuristic() {
        let analyzer = FallbackAnalyzer::new(Box::new(failing()), SkinToneAnalyzer::default());
        let regions = analyzer.detect_regions(&skin_image()).unwrap();
        assert_eq!(regions, vec![Region::new(50, 50, 100, 100, 1.0)]);
    }

    #[test]
    fn test_expressions_come_from_primary() {
        let analyzer = FallbackAnalyzer::new(Box::new(failing()), SkinToneAnalyzer::default());
        let scores = analyzer.classify_expressions(&skin_image()).unwrap();
        assert_eq!(scores.dominant().unwrap().0, "happy");
    }

    #[test]
    fn test_name_reports_primary() {
        let analyzer = FallbackAnalyzer::new(Box::new(failing()), SkinToneAnalyzer::default());
        assert_eq!(analyzer.name(), "stub");
    }

    #[test]
    fn test_attribution_names_the_backend_that_answered() {
        let primary = StubAnalyzer { result: Ok(vec![]) };
        let analyzer = FallbackAnalyzer::new(Box::new(primary), SkinToneAnalyzer::default());
        assert_eq!(analyzer.detect_attributed(&skin_image()).unwrap().analyzer, "stub");

        let analyzer = FallbackAnalyzer::new(Box::new(failing()), SkinToneAnalyzer::default());
        let detection = analyzer.detect_attributed(&skin_image()).unwrap();
        assert_eq!(detection.analyzer, SKIN_TONE_ANALYZER_NAME);
        assert_eq!(detection.regions, vec![Region::new(50, 50, 100, 100, 1.0)]);
    }
}
