use std::collections::HashMap;
use std::time::Instant;

use super::stage::Stage;

/// Receives human-readable progress from a subtitle run.
///
/// Decouples the pipeline from the host shell (terminal, log, GUI channel)
/// so each caller can observe a run without changing the orchestration.
pub trait ProgressSink: Send {
    /// The run entered `stage`.
    fn stage(&mut self, stage: Stage, message: &str);

    /// A non-fatal condition (dropped segments, cleanup failure, ...).
    fn warning(&mut self, message: &str);

    /// How long a stage took. Default: no-op.
    fn timing(&mut self, _stage: Stage, _duration_ms: f64) {}

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent sink that discards all events. Used by tests.
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn stage(&mut self, _stage: Stage, _message: &str) {}
    fn warning(&mut self, _message: &str) {}
}

/// Forwards every message to a closure, prefixed for warnings.
pub struct FnProgressSink<F: FnMut(&str) + Send> {
    f: F,
}

impl<F: FnMut(&str) + Send> FnProgressSink<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F: FnMut(&str) + Send> ProgressSink for FnProgressSink<F> {
    fn stage(&mut self, _stage: Stage, message: &str) {
        (self.f)(message);
    }

    fn warning(&mut self, message: &str) {
        (self.f)(&format!("Warning: {message}"));
    }
}

/// Sink backed by the `log` crate that also keeps the messages and
/// per-stage timings for an end-of-run summary.
pub struct LogProgressSink {
    start_time: Instant,
    timings: HashMap<Stage, f64>,
    messages: Vec<String>,
    warnings: Vec<String>,
}

impl LogProgressSink {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            timings: HashMap::new(),
            messages: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn timing_for(&self, stage: Stage) -> Option<f64> {
        self.timings.get(&stage).copied()
    }

    /// Returns the formatted summary, or `None` if no stage was timed.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!("Run summary ({:.1}s total):", elapsed_ms / 1000.0)];

        let mut stages: Vec<_> = self.timings.iter().collect();
        stages.sort_by_key(|(stage, _)| **stage as u8);
        for (stage, ms) in stages {
            let label = stage.to_string();
            lines.push(format!("  {label:12}: {ms:9.0}ms"));
        }
        if !self.warnings.is_empty() {
            lines.push(format!("  warnings: {}", self.warnings.len()));
        }

        Some(lines.join("\n"))
    }
}

impl Default for LogProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for LogProgressSink {
    fn stage(&mut self, stage: Stage, message: &str) {
        self.messages.push(message.to_string());
        if stage == Stage::Failed {
            log::error!("{message}");
        } else {
            log::info!("{message}");
        }
    }

    fn warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
        log::warn!("{message}");
    }

    fn timing(&mut self, stage: Stage, duration_ms: f64) {
        *self.timings.entry(stage).or_default() += duration_ms;
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
