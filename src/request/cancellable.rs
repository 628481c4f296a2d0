use chrono::{DateTime, Utc};

/// An operation that can be stopped by the user and that knows when it
/// started. Progress controls hold one of these to back their stop button.
pub trait Cancellable: Send + Sync {
    /// Requests cancellation. Returns `true` only if this call actually closed
    /// the operation.
    fn cancel(&self) -> bool;

    /// Start of the operation, or of the first operation in its chain.
    fn start_time(&self) -> Option<DateTime<Utc>>;
}
