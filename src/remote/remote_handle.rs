use super::{Combinable, RemoteObjectId};
use crate::request::StreamingRequest;
use crate::wire::{EncodeArguments, WireError};
use std::fmt;

/// Client-side reference to a server-owned object.
///
/// A handle is the only way to address server state: every request is minted
/// from one and is bound to its id. Two handles are equal when they reference
/// the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteHandle {
    remote_object_id: RemoteObjectId,
}

impl RemoteHandle {
    pub fn new(remote_object_id: impl Into<RemoteObjectId>) -> Self {
        Self {
            remote_object_id: remote_object_id.into(),
        }
    }

    /// Handle to the root object every session starts from.
    pub fn initial() -> Self {
        Self::new(RemoteObjectId::initial())
    }

    pub fn remote_object_id(&self) -> &RemoteObjectId {
        &self.remote_object_id
    }

    /// Builds a streaming request for `method` on this object.
    ///
    /// The arguments are encoded immediately, so an encoding failure is
    /// reported here rather than after a connection has been opened. A fresh
    /// request id is drawn only once encoding succeeded.
    pub fn create_request<A>(&self, method: &str, args: &A) -> Result<StreamingRequest, WireError>
    where
        A: EncodeArguments + ?Sized,
    {
        let arguments = args.encode_arguments()?;
        Ok(StreamingRequest::new(
            self.remote_object_id.clone(),
            method,
            arguments,
        ))
    }
}

impl Combinable for RemoteHandle {}

impl fmt::Display for RemoteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.remote_object_id, f)
    }
}

impl From<RemoteObjectId> for RemoteHandle {
    fn from(remote_object_id: RemoteObjectId) -> Self {
        Self { remote_object_id }
    }
}
