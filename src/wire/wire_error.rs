use std::fmt;

/// Errors raised while encoding or decoding wire envelopes.
#[derive(Debug)]
pub enum WireError {
    /// The value could not be represented as (or parsed from) JSON.
    Json(serde_json::Error),
    /// A request envelope was stamped with a protocol version this side does
    /// not speak.
    UnsupportedProtocolVersion { expected: u32, actual: u32 },
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::Json(e) => write!(f, "JSON error: {}", e),
            WireError::UnsupportedProtocolVersion { expected, actual } => write!(
                f,
                "Unsupported protocol version {} (expected {})",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for WireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WireError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for WireError {
    fn from(e: serde_json::Error) -> Self {
        WireError::Json(e)
    }
}
