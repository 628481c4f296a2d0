use chrono::{DateTime, Utc};

/// Returns the current wall-clock time in UTC.
///
/// Request start times are recorded with this clock so that a chain of
/// dependent requests can report the total time spent since the first one.
///
/// # Example:
/// ```rust
/// use rivulet::utils::now;
/// let started = now();
/// assert!(now() >= started);
/// ```
#[inline]
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Milliseconds elapsed between `start` and now. Returns `None` when no start
/// time has been recorded yet.
pub fn elapsed_milliseconds(start: Option<DateTime<Utc>>) -> Option<i64> {
    start.map(|start| (now() - start).num_milliseconds())
}
