mod rpc_handler;
mod rpc_server;
pub mod utils;

pub use rpc_handler::{ReplyStream, RpcCallContext};
pub use rpc_server::RpcServer;
