use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{Receiver, TryRecvError};
use serde::Serialize;
use thiserror::Error;

use crate::capture::domain::frame_source::FrameSource;
use crate::detection::domain::detection_outcome::DetectionReport;
use crate::detection::domain::expression::ExpressionScores;
use crate::detection::domain::face_analyzer::{AnalysisError, Detection, FaceAnalyzer};
use crate::pipeline::session_logger::SessionLogger;

/// Analyzer name on reports made from a hand-picked mood.
pub const MANUAL_PICK_NAME: &str = "manual pick";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Welcome,
    Scanning,
    /// Choosing a mood by hand instead of scanning.
    Manual,
    Result,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureError {
    #[error("camera access denied: {0}")]
    CameraUnavailable(String),
    #[error("camera is not active")]
    CameraInactive,
    #[error("a detection is already in progress")]
    DetectionInFlight,
    #[error("cannot capture from the {0:?} screen")]
    InvalidState(SessionState),
    #[error("failed to grab a frame: {0}")]
    FrameGrab(String),
    #[error("face detection failed: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("mood label must not be empty")]
    EmptyMood,
    #[error("detection worker stopped before reporting")]
    WorkerDisconnected,
}

pub type CaptureResult = Result<DetectionReport, CaptureError>;

type WorkerOutput = (Result<Detection, AnalysisError>, Option<ExpressionScores>);

struct PendingDetection {
    receiver: Receiver<WorkerOutput>,
    width: u32,
    height: u32,
    started: Instant,
}

/// One user's face-check flow: start camera → capture → result → reset,
/// or welcome → manual mood pick → result.
///
/// Owns the camera handle and the in-flight detection, so the analyzer
/// itself stays stateless. Detection runs on a worker thread; only one may
/// be in flight. `reset` abandons a pending detection, whose late result is
/// dropped unread. The camera is closed after every grab, on reset, and when
/// the session is dropped.
pub struct CaptureSession {
    source: Box<dyn FrameSource>,
    analyzer: Arc<dyn FaceAnalyzer>,
    logger: Box<dyn SessionLogger>,
    classify_expressions: bool,
    state: SessionState,
    pending: Option<PendingDetection>,
    result: Option<CaptureResult>,
}

impl CaptureSession {
    pub fn new(
        source: Box<dyn FrameSource>,
        analyzer: Arc<dyn FaceAnalyzer>,
        logger: Box<dyn SessionLogger>,
    ) -> Self {
        Self {
            source,
            analyzer,
            logger,
            classify_expressions: false,
            state: SessionState::Welcome,
            pending: None,
            result: None,
        }
    }

    /// Also ask the analyzer for expression scores on each capture.
    /// Analyzers without expression support leave the scores empty.
    pub fn with_expressions(mut self, enabled: bool) -> Self {
        self.classify_expressions = enabled;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn camera_active(&self) -> bool {
        self.source.is_open()
    }

    pub fn analyzer_name(&self) -> &str {
        self.analyzer.name()
    }

    pub fn is_detecting(&self) -> bool {
        self.pending.is_some()
    }

    /// Result of the last finished capture, if the session is showing one.
    pub fn result(&self) -> Option<&CaptureResult> {
        self.result.as_ref()
    }

    pub fn logger(&self) -> &dyn SessionLogger {
        self.logger.as_ref()
    }

    pub fn start_camera(&mut self) -> Result<(), CaptureError> {
        if self.state != SessionState::Welcome {
            return Err(CaptureError::InvalidState(self.state));
        }
        if self.source.is_open() {
            return Ok(());
        }
        self.source
            .open()
            .map_err(|e| CaptureError::CameraUnavailable(e.to_string()))?;
        self.logger.info("Camera started");
        Ok(())
    }

    pub fn stop_camera(&mut self) {
        if self.source.is_open() {
            self.source.close();
            self.logger.info("Camera stopped");
        }
    }

    /// Grabs a frame and hands it to a detection worker.
    ///
    /// Refused while a detection is in flight or outside the welcome
    /// screen. A failed grab is not returned here: it moves the session to
    /// the result screen with the failure as its result, like any other
    /// capture.
    pub fn begin_capture(&mut self) -> Result<(), CaptureError> {
        if self.pending.is_some() {
            return Err(CaptureError::DetectionInFlight);
        }
        if self.state != SessionState::Welcome {
            return Err(CaptureError::InvalidState(self.state));
        }
        if !self.source.is_open() {
            return Err(CaptureError::CameraInactive);
        }

        self.set_state(SessionState::Scanning);
        self.result = None;

        let grab_start = Instant::now();
        let grabbed = self.source.grab_frame();
        self.stop_camera();
        let image = match grabbed {
            Ok(image) => image,
            Err(e) => {
                self.finish(Err(CaptureError::FrameGrab(e.to_string())));
                return Ok(());
            }
        };
        self.logger.timing("grab", elapsed_ms(grab_start));

        let (width, height) = (image.width(), image.height());
        let (tx, rx) = crossbeam_channel::bounded::<WorkerOutput>(1);
        let analyzer = Arc::clone(&self.analyzer);
        let classify = self.classify_expressions;
        std::thread::spawn(move || {
            let detection = analyzer.detect_attributed(&image);
            let expressions = if classify {
                match analyzer.classify_expressions(&image) {
                    Ok(scores) => Some(scores),
                    Err(e) => {
                        log::debug!("{e}");
                        None
                    }
                }
            } else {
                None
            };
            // The session may have been reset meanwhile; nobody is listening then.
            let _ = tx.send((detection, expressions));
        });

        self.pending = Some(PendingDetection {
            receiver: rx,
            width,
            height,
            started: Instant::now(),
        });
        Ok(())
    }

    /// Non-blocking check on the in-flight detection.
    pub fn poll(&mut self) -> Option<&CaptureResult> {
        let received = self.pending.as_ref().map(|p| p.receiver.try_recv());
        match received {
            Some(Ok(output)) => self.complete(output),
            Some(Err(TryRecvError::Disconnected)) => self.abandon_worker(),
            Some(Err(TryRecvError::Empty)) => return None,
            None => {}
        }
        self.result.as_ref()
    }

    /// Blocks until the in-flight detection finishes.
    pub fn wait(&mut self) -> Option<&CaptureResult> {
        let received = self.pending.as_ref().map(|p| p.receiver.recv());
        match received {
            Some(Ok(output)) => self.complete(output),
            Some(Err(_)) => self.abandon_worker(),
            None => {}
        }
        self.result.as_ref()
    }

    /// Capture and wait for the result in one call.
    pub fn capture(&mut self) -> CaptureResult {
        self.begin_capture()?;
        match self.wait() {
            Some(result) => result.clone(),
            None => Err(CaptureError::WorkerDisconnected),
        }
    }

    /// Leaves the welcome screen to pick a mood by hand. Releases the camera.
    pub fn open_manual(&mut self) -> Result<(), CaptureError> {
        if self.state != SessionState::Welcome {
            return Err(CaptureError::InvalidState(self.state));
        }
        self.stop_camera();
        self.set_state(SessionState::Manual);
        Ok(())
    }

    /// Records a hand-picked mood as the result, scored 1.0 with no regions.
    pub fn pick_mood(&mut self, label: &str) -> CaptureResult {
        if self.state != SessionState::Manual {
            return Err(CaptureError::InvalidState(self.state));
        }
        let label = label.trim();
        if label.is_empty() {
            return Err(CaptureError::EmptyMood);
        }
        let scores: ExpressionScores = [(label, 1.0)].into_iter().collect();
        let report = DetectionReport::new(MANUAL_PICK_NAME, 0, 0, Vec::new())
            .with_expressions(Some(scores));
        self.logger.info(&format!("Mood picked: {label}"));
        self.set_state(SessionState::Result);
        self.result = Some(Ok(report.clone()));
        Ok(report)
    }

    /// Back to the welcome screen, discarding any result or pending
    /// detection and releasing the camera.
    pub fn reset(&mut self) {
        if self.pending.take().is_some() {
            self.logger.info("Discarding pending detection");
        }
        self.stop_camera();
        self.result = None;
        self.set_state(SessionState::Welcome);
    }

    fn complete(&mut self, (detection, expressions): WorkerOutput) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        self.logger.timing("detect", elapsed_ms(pending.started));
        let result = detection.map_err(CaptureError::from).map(|detection| {
            DetectionReport::new(
                &detection.analyzer,
                pending.width,
                pending.height,
                detection.regions,
            )
            .with_expressions(expressions)
        });
        self.finish(result);
    }

    fn abandon_worker(&mut self) {
        self.pending = None;
        self.finish(Err(CaptureError::WorkerDisconnected));
    }

    fn finish(&mut self, result: CaptureResult) {
        match &result {
            Ok(report) => self.logger.info(&report.outcome.message()),
            Err(e) => self.logger.info(&format!("Capture failed: {e}")),
        }
        self.result = Some(result);
        self.set_state(SessionState::Result);
    }

    fn set_state(&mut self, to: SessionState) {
        let from = self.state;
        if from != to {
            self.logger.transition(from, to);
            self.state = to;
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.stop_camera();
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
