use super::WireError;
use serde::Serialize;

/// JSON text of a request's arguments, exactly as it is embedded (as a string)
/// in the request envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArguments(String);

impl EncodedArguments {
    /// The encoding of "no arguments".
    pub fn null() -> Self {
        Self("null".to_string())
    }

    /// Wraps JSON text produced by a type's own canonical encoder. The text is
    /// forwarded verbatim; the server is the one that parses it.
    pub fn custom(json_text: impl Into<String>) -> Self {
        Self(json_text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Capability of producing the `arguments` field of a request envelope.
///
/// Types with a canonical wire form implement this directly (returning
/// [`EncodedArguments::custom`]); anything else that is `Serialize` is wrapped
/// in [`Json`] and encoded structurally.
pub trait EncodeArguments {
    fn encode_arguments(&self) -> Result<EncodedArguments, WireError>;
}

/// Structural JSON encoding for any `Serialize` value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Json<T>(pub T);

impl<T: Serialize> EncodeArguments for Json<T> {
    fn encode_arguments(&self) -> Result<EncodedArguments, WireError> {
        Ok(EncodedArguments(serde_json::to_string(&self.0)?))
    }
}

impl EncodeArguments for () {
    fn encode_arguments(&self) -> Result<EncodedArguments, WireError> {
        Ok(EncodedArguments::null())
    }
}

impl<A: EncodeArguments> EncodeArguments for Option<A> {
    fn encode_arguments(&self) -> Result<EncodedArguments, WireError> {
        match self {
            Some(args) => args.encode_arguments(),
            None => Ok(EncodedArguments::null()),
        }
    }
}

impl EncodeArguments for serde_json::Value {
    fn encode_arguments(&self) -> Result<EncodedArguments, WireError> {
        Ok(EncodedArguments(serde_json::to_string(self)?))
    }
}

impl EncodeArguments for EncodedArguments {
    fn encode_arguments(&self) -> Result<EncodedArguments, WireError> {
        Ok(self.clone())
    }
}
