mod cancellable;
mod request_error;
mod request_state;
mod rpc_connection;
mod rpc_event;
mod streaming_request;

pub use cancellable::Cancellable;
pub use request_error::RpcRequestError;
pub use request_state::RequestState;
pub use rpc_connection::RpcConnection;
pub use rpc_event::RpcEvent;
pub use streaming_request::{OpenOutcome, StreamingRequest};
