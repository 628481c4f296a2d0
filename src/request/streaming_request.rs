use super::{Cancellable, RequestState, RpcConnection, RpcEvent, RpcRequestError};
use crate::constants::{DEFAULT_COMMUNICATION_ERROR, NORMAL_CLOSURE_CODE, RPC_PROTO_VERSION};
use crate::remote::RemoteObjectId;
use crate::utils::{increment_u64_id, now};
use crate::wire::{DecodedReply, EncodedArguments, ReplyEnvelope, RequestEnvelope, close_reason};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Result of handing an opened connection to a request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OpenOutcome {
    /// The envelope was sent; replies may now arrive.
    Sent,
    /// The request was cancelled while connecting. Nothing was sent and the
    /// connection is being closed.
    Cancelled,
}

/// One connection-scoped RPC call that may yield many partial results.
///
/// This type is the transport-agnostic state machine. A runtime-specific
/// driver opens the connection and feeds every connection event into the
/// `handle_*` methods, forwarding the returned [`RpcEvent`]s to an observer.
/// The request owns the connection from open until it reaches a terminal
/// state; nothing else may touch it.
pub struct StreamingRequest {
    object_id: RemoteObjectId,
    method: String,
    arguments: EncodedArguments,
    request_id: u64,
    proto_version: u32,
    start_time: Option<DateTime<Utc>>,
    cancelled: bool,
    // True until the connection opens, and again after cancel or close.
    closed: bool,
    state: RequestState,
    connection: Option<Box<dyn RpcConnection>>,
}

impl StreamingRequest {
    /// Creates an idle request with a fresh, process-unique request id.
    pub fn new(object_id: RemoteObjectId, method: &str, arguments: EncodedArguments) -> Self {
        Self {
            object_id,
            method: method.to_string(),
            arguments,
            request_id: increment_u64_id(),
            proto_version: RPC_PROTO_VERSION,
            start_time: None,
            cancelled: false,
            closed: true,
            state: RequestState::Idle,
            connection: None,
        }
    }

    pub fn object_id(&self) -> &RemoteObjectId {
        &self.object_id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn arguments(&self) -> &EncodedArguments {
        &self.arguments
    }

    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn proto_version(&self) -> u32 {
        self.proto_version
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    /// Overrides the start time, so that a sequence of dependent requests
    /// reports the total time since the first of them.
    ///
    /// Ignored once the request has been invoked.
    pub fn set_start_time(&mut self, start: Option<DateTime<Utc>>) {
        if self.state != RequestState::Idle {
            tracing::warn!("{} already invoked; keeping its start time", self);
            return;
        }
        self.start_time = start;
    }

    /// Marks this request as a continuation of `previous`, inheriting its
    /// start time. Must be called before invoking; later calls are ignored.
    pub fn chain(&mut self, previous: Option<&dyn Cancellable>) {
        if let Some(previous) = previous {
            self.set_start_time(previous.start_time());
        }
    }

    pub fn envelope(&self) -> RequestEnvelope {
        RequestEnvelope {
            object_id: self.object_id.as_str().to_string(),
            method: self.method.clone(),
            arguments: self.arguments.as_str().to_string(),
            request_id: self.request_id,
            proto_version: self.proto_version,
        }
    }

    /// Moves the request from idle to connecting and stamps the start time
    /// unless one was set explicitly. A request cancelled while idle is closed
    /// instead and never connects.
    pub fn begin_invoke(&mut self) -> Result<(), RpcRequestError> {
        if self.state != RequestState::Idle {
            return Err(RpcRequestError::AlreadyInvoked);
        }
        if self.cancelled {
            tracing::debug!("{} cancelled before invoke; not connecting", self);
            self.state = RequestState::Closed;
            return Err(RpcRequestError::Cancelled);
        }
        if self.start_time.is_none() {
            self.start_time = Some(now());
        }
        self.state = RequestState::Connecting;
        tracing::debug!("{} connecting", self);
        Ok(())
    }

    /// Takes ownership of a freshly opened connection and sends the request
    /// envelope over it, exactly once.
    ///
    /// A request cancelled while connecting closes the connection instead.
    pub fn handle_open(
        &mut self,
        mut connection: Box<dyn RpcConnection>,
    ) -> Result<OpenOutcome, RpcRequestError> {
        if self.state != RequestState::Connecting {
            return Err(RpcRequestError::AlreadySent);
        }

        if self.cancelled {
            tracing::debug!("{} cancelled before open; closing without sending", self);
            connection.close();
            self.connection = Some(connection);
            return Ok(OpenOutcome::Cancelled);
        }

        let message = self.envelope().to_json()?;
        self.closed = false;
        self.state = RequestState::Active;
        tracing::debug!("Sending message {}", message);
        connection.send_text(message);
        self.connection = Some(connection);
        Ok(OpenOutcome::Sent)
    }

    /// Decodes one inbound text frame.
    ///
    /// Returns `None` once the request is closed: frames racing a
    /// cancellation are dropped. A malformed frame yields an error event but
    /// does not end the stream.
    pub fn handle_message<T: DeserializeOwned>(&mut self, text: &str) -> Option<RpcEvent<T>> {
        if self.closed {
            tracing::trace!("{} dropping frame received after close", self);
            return None;
        }
        tracing::trace!("Reply received: {}", text);

        match ReplyEnvelope::decode::<T>(text) {
            DecodedReply::Partial(partial) => Some(RpcEvent::Progress(partial)),
            DecodedReply::RemoteError(message) => Some(RpcEvent::Error(message)),
            DecodedReply::Malformed(message) => {
                tracing::warn!("{} received malformed reply: {}", self, message);
                Some(RpcEvent::Error(message))
            }
        }
    }

    /// Handles the end of the connection.
    ///
    /// A normal closure completes the stream. Any other code produces the
    /// mapped reason as an error followed by a completion, so observers can
    /// always tear down their progress UI. Only the first close is reported.
    pub fn handle_close<T>(&mut self, code: u16) -> Vec<RpcEvent<T>> {
        if self.state == RequestState::Closed {
            return Vec::new();
        }
        self.terminate();
        tracing::debug!("{} closed with code {}", self, code);

        if code == NORMAL_CLOSURE_CODE {
            vec![RpcEvent::Completed]
        } else {
            vec![
                RpcEvent::Error(close_reason(code).to_string()),
                RpcEvent::Completed,
            ]
        }
    }

    /// Handles a failure to establish (or keep) the transport. There is no
    /// retry; the request becomes terminal.
    pub fn handle_transport_error<T>(&mut self, message: Option<String>) -> Option<RpcEvent<T>> {
        if self.state == RequestState::Closed {
            return None;
        }
        self.terminate();
        let message = message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| DEFAULT_COMMUNICATION_ERROR.to_string());
        tracing::debug!("{} transport error: {}", self, message);
        Some(RpcEvent::Error(message))
    }

    /// Cancels the request.
    ///
    /// Returns `true` if the request was open and is now closing. Returns
    /// `false` for requests that have not opened yet; those are still flagged,
    /// so a request cancelled while idle or connecting never sends. A request
    /// that already closed is left untouched.
    pub fn cancel(&mut self) -> bool {
        match self.state {
            RequestState::Idle | RequestState::Connecting => {
                self.cancelled = true;
                tracing::debug!("{} cancelled before open", self);
                return false;
            }
            RequestState::Closed => return false,
            RequestState::Active if self.closed => return false,
            RequestState::Active => {}
        }
        self.cancelled = true;
        self.closed = true;
        if let Some(connection) = self.connection.as_mut() {
            connection.close();
        }
        tracing::debug!("{} cancelled", self);
        true
    }

    fn terminate(&mut self) {
        self.closed = true;
        self.state = RequestState::Closed;
        // Releasing the connection lets the transport wind down.
        self.connection = None;
    }
}

impl fmt::Display for StreamingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}#{}", self.object_id, self.method, self.request_id)
    }
}

impl fmt::Debug for StreamingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingRequest")
            .field("object_id", &self.object_id)
            .field("method", &self.method)
            .field("request_id", &self.request_id)
            .field("state", &self.state)
            .field("cancelled", &self.cancelled)
            .field("closed", &self.closed)
            .finish()
    }
}

/// A shared request doubles as the cancellation handle handed to progress
/// controls.
impl Cancellable for Mutex<StreamingRequest> {
    fn cancel(&self) -> bool {
        self.lock().unwrap_or_else(PoisonError::into_inner).cancel()
    }

    fn start_time(&self) -> Option<DateTime<Utc>> {
        self.lock().unwrap_or_else(PoisonError::into_inner).start_time()
    }
}
