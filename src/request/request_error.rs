use crate::wire::WireError;
use std::fmt;

/// Misuse of a [`StreamingRequest`](super::StreamingRequest) life-cycle.
#[derive(Debug)]
pub enum RpcRequestError {
    /// `invoke` was called on a request that already left the idle state.
    AlreadyInvoked,
    /// An open event arrived for a request that is not connecting, which
    /// would send the envelope a second time.
    AlreadySent,
    /// The request was cancelled before it was invoked.
    Cancelled,
    /// The request envelope could not be encoded.
    Wire(WireError),
}

impl fmt::Display for RpcRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcRequestError::AlreadyInvoked => write!(f, "Request has already been invoked"),
            RpcRequestError::AlreadySent => write!(f, "Request has already been sent"),
            RpcRequestError::Cancelled => write!(f, "Request was cancelled before it was invoked"),
            RpcRequestError::Wire(e) => write!(f, "Wire error: {}", e),
        }
    }
}

impl std::error::Error for RpcRequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RpcRequestError::Wire(e) => Some(e),
            _ => None,
        }
    }
}

impl From<WireError> for RpcRequestError {
    fn from(e: WireError) -> Self {
        RpcRequestError::Wire(e)
    }
}
