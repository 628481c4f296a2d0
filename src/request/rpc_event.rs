use crate::wire::PartialResult;

/// Everything an observer can be told about a streaming request.
///
/// A well-formed stream is any number of `Progress` and `Error` events
/// followed by at most one `Completed`. An abnormal close produces an `Error`
/// immediately followed by `Completed`.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcEvent<T> {
    Progress(PartialResult<T>),
    Error(String),
    Completed,
}

impl<T> RpcEvent<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, RpcEvent::Completed)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RpcEvent::Error(_))
    }
}
