use super::{EncodedArguments, WireError};
use crate::constants::RPC_PROTO_VERSION;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The single message a client sends on a freshly opened connection.
///
/// `arguments` holds JSON text, so the arguments end up encoded twice on the
/// wire: once on their own, then again as a string inside the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    pub object_id: String,
    pub method: String,
    pub arguments: String,
    pub request_id: u64,
    pub proto_version: u32,
}

impl RequestEnvelope {
    pub fn new(
        object_id: impl Into<String>,
        method: impl Into<String>,
        arguments: EncodedArguments,
        request_id: u64,
    ) -> Self {
        Self {
            object_id: object_id.into(),
            method: method.into(),
            arguments: arguments.into_string(),
            request_id,
            proto_version: RPC_PROTO_VERSION,
        }
    }

    pub fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Decodes the embedded argument text into `T`.
    pub fn decode_arguments<T: DeserializeOwned>(&self) -> Result<T, WireError> {
        Ok(serde_json::from_str(&self.arguments)?)
    }

    pub fn check_proto_version(&self) -> Result<(), WireError> {
        if self.proto_version == RPC_PROTO_VERSION {
            Ok(())
        } else {
            Err(WireError::UnsupportedProtocolVersion {
                expected: RPC_PROTO_VERSION,
                actual: self.proto_version,
            })
        }
    }
}
