use serde::{Deserialize, Serialize};

/// One increment of a streaming reply.
///
/// `done` is the fraction of the work completed so far. `data` is absent on
/// pure progress updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialResult<T> {
    pub done: f64,
    pub data: Option<T>,
}

impl<T> PartialResult<T> {
    pub fn new(done: f64, data: Option<T>) -> Self {
        Self { done, data }
    }

    /// A progress-only update.
    pub fn progress(done: f64) -> Self {
        Self { done, data: None }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> PartialResult<U> {
        PartialResult {
            done: self.done,
            data: self.data.map(f),
        }
    }
}
