use crate::request::Cancellable;
use std::sync::Arc;

/// A progress indicator for one operation.
pub trait ProgressReporter: Send {
    /// Moves the indicator. Values outside `[0, 1]` are the reporter's to
    /// clamp.
    fn set_position(&mut self, done: f64);

    /// Dismisses the indicator.
    fn set_finished(&mut self);
}

/// Where errors are shown to the user.
pub trait ErrorReporter: Send + Sync {
    fn report_error(&self, message: &str);

    /// Removes whatever error is currently displayed.
    fn clear(&self);
}

/// The display a receiver reports to: it hands out progress indicators bound
/// to a cancellable operation and owns a single error reporter.
pub trait RenderSurface {
    fn new_progress_bar(
        &self,
        operation: Option<Arc<dyn Cancellable>>,
        description: &str,
    ) -> Box<dyn ProgressReporter>;

    fn error_reporter(&self) -> Arc<dyn ErrorReporter>;
}
