use crate::constants::INITIAL_OBJECT_ID;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque token naming a server-side object.
///
/// Apart from [`RemoteObjectId::initial`], ids are only ever obtained from the
/// results of earlier RPC calls. The client never interprets their contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteObjectId(String);

impl RemoteObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The well-known id of the root object.
    pub fn initial() -> Self {
        Self(INITIAL_OBJECT_ID.to_string())
    }

    pub fn is_initial(&self) -> bool {
        self.0 == INITIAL_OBJECT_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RemoteObjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RemoteObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for RemoteObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
