// Wire protocol constants

/// Protocol version stamped on every request envelope. The server rejects
/// envelopes carrying any other value.
pub const RPC_PROTO_VERSION: u32 = 6;

/// Path segment of the WebSocket endpoint, relative to the page origin.
/// This must match the web application server configuration.
pub const RPC_REQUEST_PATH: &str = "rpc";

/// Identifier of the root object every session starts from.
pub const INITIAL_OBJECT_ID: &str = "0";

/// The only close code that counts as a successful end of stream.
pub const NORMAL_CLOSURE_CODE: u16 = 1000;

/// Close code reported when the peer closed without a status code
/// (including our own cancellation, which sends an empty close frame).
pub const NO_STATUS_CLOSE_CODE: u16 = 1005;

/// Close code reported when the transport vanished without a close frame.
pub const ABNORMAL_CLOSE_CODE: u16 = 1006;

/// Message forwarded when a transport error carries no description.
pub const DEFAULT_COMMUNICATION_ERROR: &str = "Error communicating to server.";
