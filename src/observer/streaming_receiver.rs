use super::{ErrorReporter, ProgressReporter, RenderSurface, RpcObserver};
use crate::request::{Cancellable, RpcEvent};
use crate::utils::elapsed_milliseconds;
use crate::wire::PartialResult;
use std::sync::Arc;

/// Observer that advances a progress indicator for every partial result and
/// reports errors on a display surface.
///
/// The receiver finalizes exactly once: either on the first error or on
/// completion. Every event after that is ignored, which is what makes the
/// error-then-completed pair of an abnormal close safe to deliver.
pub struct StreamingReceiver {
    progress_bar: Box<dyn ProgressReporter>,
    reporter: Arc<dyn ErrorReporter>,
    operation: Option<Arc<dyn Cancellable>>,
    description: String,
    finished: bool,
}

impl StreamingReceiver {
    /// Creates a receiver for `operation`, whose progress indicator's stop
    /// button cancels it.
    ///
    /// Clears any error currently shown on the surface.
    // TODO: Clearing on construction also wipes errors from unrelated
    // operations sharing the surface; scope the reset to this operation.
    pub fn new(
        surface: &dyn RenderSurface,
        operation: Option<Arc<dyn Cancellable>>,
        description: impl Into<String>,
    ) -> Self {
        let description = description.into();
        let progress_bar = surface.new_progress_bar(operation.clone(), &description);
        let reporter = surface.error_reporter();
        reporter.clear();

        Self {
            progress_bar,
            reporter,
            operation,
            description,
            finished: false,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Milliseconds since the bound operation (or the first operation it was
    /// chained to) started.
    pub fn elapsed_milliseconds(&self) -> Option<i64> {
        self.operation
            .as_ref()
            .and_then(|operation| elapsed_milliseconds(operation.start_time()))
    }

    pub fn on_next<T>(&mut self, partial: &PartialResult<T>) {
        if self.finished {
            return;
        }
        self.progress_bar.set_position(partial.done);
        if let Some(elapsed) = self.elapsed_milliseconds() {
            tracing::trace!("{}: progress {} after {} ms", self.description, partial.done, elapsed);
        }
    }

    pub fn on_error(&mut self, message: &str) {
        if self.finished {
            tracing::trace!("{}: ignoring error after finish: {}", self.description, message);
            return;
        }
        self.reporter.report_error(message);
        self.finish();
    }

    pub fn on_completed(&mut self) {
        self.finish();
    }

    /// Stops the progress indicator. Idempotent.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.progress_bar.set_finished();
    }
}

impl<T> RpcObserver<T> for StreamingReceiver {
    fn on_event(&mut self, event: RpcEvent<T>) {
        match event {
            RpcEvent::Progress(partial) => self.on_next(&partial),
            RpcEvent::Error(message) => self.on_error(&message),
            RpcEvent::Completed => self.on_completed(),
        }
    }
}
