/// The transport half a [`StreamingRequest`](super::StreamingRequest) owns
/// once its connection is open.
///
/// Implementations are expected to be non-blocking: `send_text` and `close`
/// enqueue work for the runtime's I/O facility and return immediately.
pub trait RpcConnection: Send {
    fn send_text(&mut self, text: String);

    /// Starts the closing handshake. The resulting close event is reported
    /// back to the request through its close handler like any other.
    fn close(&mut self);
}
