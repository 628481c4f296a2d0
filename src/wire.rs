mod close_code;
mod partial_result;
mod reply_envelope;
mod request_envelope;
mod rpc_arguments;
mod wire_error;

pub use close_code::{CloseCode, UNKNOWN_CLOSE_REASON, close_reason};
pub use partial_result::PartialResult;
pub use reply_envelope::{DecodedReply, ReplyEnvelope};
pub use request_envelope::RequestEnvelope;
pub use rpc_arguments::{EncodeArguments, EncodedArguments, Json};
pub use wire_error::WireError;
