use crate::{EndpointError, RpcCall, RpcEndpoint};
use rivulet::remote::RemoteHandle;
use rivulet::request::StreamingRequest;
use rivulet::wire::{EncodeArguments, WireError};

/// Binds streaming requests to the WebSocket endpoint of the page origin.
///
/// The client holds no connection itself: every call opens (and owns) its
/// own.
#[derive(Debug, Clone)]
pub struct RpcClient {
    endpoint: RpcEndpoint,
}

impl RpcClient {
    pub fn new(host: &str, port: u16) -> Self {
        Self::with_endpoint(RpcEndpoint::new(host, port))
    }

    pub fn from_origin(origin: &str) -> Result<Self, EndpointError> {
        Ok(Self::with_endpoint(RpcEndpoint::from_origin(origin)?))
    }

    pub fn with_endpoint(endpoint: RpcEndpoint) -> Self {
        Self { endpoint }
    }

    pub fn endpoint(&self) -> &RpcEndpoint {
        &self.endpoint
    }

    /// Prepares `request` for invocation against this client's endpoint.
    pub fn call(&self, request: StreamingRequest) -> RpcCall {
        RpcCall::new(request, self.endpoint.url())
    }

    /// Shorthand for `handle.create_request(..)` followed by [`Self::call`].
    pub fn request<A>(
        &self,
        handle: &RemoteHandle,
        method: &str,
        args: &A,
    ) -> Result<RpcCall, WireError>
    where
        A: EncodeArguments + ?Sized,
    {
        Ok(self.call(handle.create_request(method, args)?))
    }
}
