use std::collections::HashMap;
use std::time::Instant;

use crate::pipeline::capture_session::SessionState;

/// Cross-cutting logger for capture-session events.
///
/// Decouples the session from specific output mechanisms (log crate,
/// stderr summary, a UI debug panel) so each host can observe it without
/// changing the session code.
pub trait SessionLogger: Send {
    /// Record a state-machine transition.
    fn transition(&mut self, from: SessionState, to: SessionState);

    /// Record how long a named stage took for one capture.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullSessionLogger;

impl SessionLogger for NullSessionLogger {
    fn transition(&mut self, _from: SessionState, _to: SessionState) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI-oriented logger that keeps per-stage timings and transition counts
/// and reports them at the end of the session.
pub struct StdoutSessionLogger {
    timings: HashMap<String, Vec<f64>>,
    transitions: HashMap<(SessionState, SessionState), usize>,
    start_time: Instant,
}

impl StdoutSessionLogger {
    pub fn new() -> Self {
        Self {
            timings: HashMap::new(),
            transitions: HashMap::new(),
            start_time: Instant::now(),
        }
    }

    /// Returns the formatted summary string, or `None` if nothing was timed.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let captures = self.captures_completed();
        let mut lines = vec![format!(
            "Session summary ({captures} capture(s), {:.1}s total):",
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = total_ms / durations.len() as f64;
            let max_ms = durations.iter().copied().fold(0.0, f64::max);
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  max {max_ms:6.1}ms  total {total_ms:7.0}ms"
            ));
        }

        Some(lines.join("\n"))
    }

    /// Number of `Scanning → Result` transitions seen so far.
    pub fn captures_completed(&self) -> usize {
        self.transitions
            .get(&(SessionState::Scanning, SessionState::Result))
            .copied()
            .unwrap_or(0)
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }
}

impl Default for StdoutSessionLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLogger for StdoutSessionLogger {
    fn transition(&mut self, from: SessionState, to: SessionState) {
        *self.transitions.entry((from, to)).or_default() += 1;
        log::debug!("Session: {from:?} -> {to:?}");
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            eprintln!("{text}");
        }
    }
}
