use super::{ErrorReporter, ProgressReporter, RenderSurface};
use crate::request::Cancellable;
use std::sync::Arc;

/// A [`RenderSurface`] that writes progress and errors to `tracing`. Useful
/// for headless callers and demos.
#[derive(Clone)]
pub struct LogSurface {
    reporter: Arc<LogErrorReporter>,
}

impl Default for LogSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSurface {
    pub fn new() -> Self {
        Self {
            reporter: Arc::new(LogErrorReporter),
        }
    }
}

impl RenderSurface for LogSurface {
    fn new_progress_bar(
        &self,
        operation: Option<Arc<dyn Cancellable>>,
        description: &str,
    ) -> Box<dyn ProgressReporter> {
        Box::new(LogProgressBar::new(operation, description))
    }

    fn error_reporter(&self) -> Arc<dyn ErrorReporter> {
        self.reporter.clone()
    }
}

pub struct LogErrorReporter;

impl ErrorReporter for LogErrorReporter {
    fn report_error(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn clear(&self) {}
}

/// Progress indicator that logs its position, clamped to `[0, 1]`.
pub struct LogProgressBar {
    operation: Option<Arc<dyn Cancellable>>,
    description: String,
    position: f64,
    finished: bool,
}

impl LogProgressBar {
    pub fn new(operation: Option<Arc<dyn Cancellable>>, description: &str) -> Self {
        Self {
            operation,
            description: description.to_string(),
            position: 0.0,
            finished: false,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The stop button.
    pub fn cancel(&self) -> bool {
        self.operation
            .as_ref()
            .is_some_and(|operation| operation.cancel())
    }
}

impl ProgressReporter for LogProgressBar {
    fn set_position(&mut self, done: f64) {
        self.position = if done.is_nan() { 0.0 } else { done.clamp(0.0, 1.0) };
        tracing::info!("{}: {:.0}%", self.description, self.position * 100.0);
    }

    fn set_finished(&mut self) {
        self.finished = true;
        tracing::info!("{}: done", self.description);
    }
}
