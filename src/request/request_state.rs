/// Life-cycle of a [`StreamingRequest`](super::StreamingRequest).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RequestState {
    /// Constructed, not yet invoked.
    Idle,
    /// Invoked; the connection is being established.
    Connecting,
    /// The request envelope has been sent; replies may arrive.
    Active,
    /// Terminal: completed, failed or cancelled.
    Closed,
}
