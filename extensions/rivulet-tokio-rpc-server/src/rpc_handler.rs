use futures_util::stream::BoxStream;
use rivulet::remote::RemoteObjectId;
use rivulet::wire::PartialResult;
use serde_json::Value;
use std::sync::Arc;

/// Everything a handler learns about the call it serves.
#[derive(Debug, Clone)]
pub struct RpcCallContext {
    pub object_id: RemoteObjectId,
    pub method: String,
    pub arguments: Value,
    pub request_id: u64,
}

/// Replies of one call, in send order. An `Err` item is sent as an error
/// reply and ends the call.
pub type ReplyStream = BoxStream<'static, Result<PartialResult<Value>, String>>;

pub(crate) type RpcStreamHandler = Arc<dyn Fn(RpcCallContext) -> ReplyStream + Send + Sync>;
