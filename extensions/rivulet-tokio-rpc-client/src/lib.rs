mod rpc_call;
mod rpc_client;
mod rpc_endpoint;
mod ws_connection;

pub use rpc_call::{ChannelObserver, RpcCall};
pub use rpc_client::RpcClient;
pub use rpc_endpoint::{EndpointError, RpcEndpoint};
