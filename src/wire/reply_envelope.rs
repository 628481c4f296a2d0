use super::{PartialResult, WireError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A single server-to-client frame.
///
/// When `is_error` is false, `result` holds a JSON-encoded [`PartialResult`];
/// otherwise it holds a human-readable error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyEnvelope {
    pub is_error: bool,
    pub result: String,
}

/// Outcome of decoding one inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedReply<T> {
    Partial(PartialResult<T>),
    /// The server reported an application-level error.
    RemoteError(String),
    /// The frame (or the result it carries) could not be decoded.
    Malformed(String),
}

impl ReplyEnvelope {
    pub fn success<T: Serialize>(partial: &PartialResult<T>) -> Result<Self, WireError> {
        Ok(Self {
            is_error: false,
            result: serde_json::to_string(partial)?,
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            result: message.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Interprets this envelope as carrying a `PartialResult<T>`.
    pub fn into_partial<T: DeserializeOwned>(self) -> DecodedReply<T> {
        if self.is_error {
            return DecodedReply::RemoteError(self.result);
        }
        match serde_json::from_str::<PartialResult<T>>(&self.result) {
            Ok(partial) => DecodedReply::Partial(partial),
            Err(e) => DecodedReply::Malformed(e.to_string()),
        }
    }

    /// Decodes a raw text frame in one step.
    pub fn decode<T: DeserializeOwned>(text: &str) -> DecodedReply<T> {
        match Self::from_json(text) {
            Ok(envelope) => envelope.into_partial(),
            Err(e) => DecodedReply::Malformed(e.to_string()),
        }
    }
}
