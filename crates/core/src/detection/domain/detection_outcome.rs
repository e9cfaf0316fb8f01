use serde::Serialize;

use crate::detection::domain::expression::ExpressionScores;
use crate::shared::region::Region;

/// Count-classified result of one capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DetectionOutcome {
    NoFace,
    SingleFace,
    MultipleFaces { count: usize },
}

impl DetectionOutcome {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => DetectionOutcome::NoFace,
            1 => DetectionOutcome::SingleFace,
            count => DetectionOutcome::MultipleFaces { count },
        }
    }

    pub fn face_count(&self) -> usize {
        match self {
            DetectionOutcome::NoFace => 0,
            DetectionOutcome::SingleFace => 1,
            DetectionOutcome::MultipleFaces { count } => *count,
        }
    }

    /// Only a single face counts as a successful check.
    pub fn is_pass(&self) -> bool {
        matches!(self, DetectionOutcome::SingleFace)
    }

    pub fn message(&self) -> String {
        match self {
            DetectionOutcome::NoFace => "No face detected in the image. Please try again with \
                your face clearly visible in good lighting."
                .to_string(),
            DetectionOutcome::SingleFace => "Face detected successfully!".to_string(),
            DetectionOutcome::MultipleFaces { count } => format!(
                "Multiple faces detected ({count} faces). Please ensure only one person \
                 is in the frame."
            ),
        }
    }
}

/// Everything one capture produced, ready for display or serialization.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetectionReport {
    pub outcome: DetectionOutcome,
    pub regions: Vec<Region>,
    pub analyzer: String,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expressions: Option<ExpressionScores>,
}

impl DetectionReport {
    pub fn new(analyzer: &str, width: u32, height: u32, regions: Vec<Region>) -> Self {
        Self {
            outcome: DetectionOutcome::from_count(regions.len()),
            regions,
            analyzer: analyzer.to_string(),
            width,
            height,
            expressions: None,
        }
    }

    pub fn with_expressions(mut self, expressions: Option<ExpressionScores>) -> Self {
        self.expressions = expressions;
        self
    }
}
