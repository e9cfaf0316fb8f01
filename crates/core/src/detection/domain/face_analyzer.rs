use thiserror::Error;

use crate::detection::domain::expression::ExpressionScores;
use crate::shared::raster_image::RasterImage;
use crate::shared::region::Region;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("{analyzer} does not support expression classification")]
    ExpressionsUnsupported { analyzer: String },
    #[error("{analyzer} failed: {reason}")]
    Backend { analyzer: String, reason: String },
}

/// Regions plus the name of the backend that actually produced them.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub analyzer: String,
    pub regions: Vec<Region>,
}

/// Domain interface for anything that can find faces in a still.
///
/// Native detectors and ML libraries plug in here; the skin-tone heuristic
/// is the always-available fallback. Analyzers are shared with detection
/// workers, so they must not hold per-call state.
pub trait FaceAnalyzer: Send + Sync {
    /// Short backend name for logs and reports.
    fn name(&self) -> &str;

    fn detect_regions(&self, image: &RasterImage) -> Result<Vec<Region>, AnalysisError>;

    /// Like `detect_regions`, naming the backend that answered. Decorators
    /// that may hand the work to another analyzer override this.
    fn detect_attributed(&self, image: &RasterImage) -> Result<Detection, AnalysisError> {
        Ok(Detection {
            analyzer: self.name().to_string(),
            regions: self.detect_regions(image)?,
        })
    }

    fn classify_expressions(&self, _image: &RasterImage) -> Result<ExpressionScores, AnalysisError> {
        Err(AnalysisError::ExpressionsUnsupported {
            analyzer: self.name().to_string(),
        })
    }
}
