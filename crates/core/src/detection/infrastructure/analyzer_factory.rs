use std::sync::Arc;

use crate::detection::domain::face_analyzer::{AnalysisError, FaceAnalyzer};
use crate::detection::infrastructure::delayed_analyzer::DelayedAnalyzer;
use crate::detection::infrastructure::fallback_analyzer::FallbackAnalyzer;
use crate::detection::infrastructure::skin_tone_analyzer::{
    SkinToneAnalyzer, SKIN_TONE_ANALYZER_NAME,
};
use crate::shared::settings::DetectorSettings;

/// Source of an optional native or ML-backed analyzer.
///
/// `probe` is called once at startup; an error means the backend is not
/// available on this machine.
pub trait AnalyzerProvider {
    fn name(&self) -> &str;
    fn probe(&self) -> Result<Box<dyn FaceAnalyzer>, AnalysisError>;
}

/// Creates the best available analyzer.
///
/// Providers are probed in order and the first one that comes up is used,
/// backed by the skin-tone heuristic for failed detections. With no
/// provider available the heuristic runs alone. Logs which backend is
/// selected.
pub fn create_analyzer(
    providers: &[Box<dyn AnalyzerProvider>],
    settings: &DetectorSettings,
) -> Arc<dyn FaceAnalyzer> {
    let heuristic = SkinToneAnalyzer::from_settings(settings);

    let mut selected: Option<Box<dyn FaceAnalyzer>> = None;
    for provider in providers {
        match provider.probe() {
            Ok(native) => {
                log::info!("Using {} for face detection", provider.name());
                let analyzer: Box<dyn FaceAnalyzer> =
                    Box::new(FallbackAnalyzer::new(native, heuristic.clone()));
                selected = Some(analyzer);
                break;
            }
            Err(e) => log::info!("{} unavailable: {e}", provider.name()),
        }
    }
    let analyzer: Box<dyn FaceAnalyzer> = match selected {
        Some(analyzer) => analyzer,
        None => {
            log::info!("No native face detector available, using {SKIN_TONE_ANALYZER_NAME}");
            Box::new(heuristic)
        }
    };

    let delay = settings.processing_delay();
    if delay.is_zero() {
        Arc::from(analyzer)
    } else {
        log::debug!("Delaying detection results by {delay:?}");
        Arc::new(DelayedAnalyzer::new(analyzer, delay))
    }
}
