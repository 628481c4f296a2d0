mod incremental_receiver;
mod log_surface;
mod on_complete_receiver;
mod render_surface;
mod rpc_observer;
mod streaming_receiver;

pub use incremental_receiver::IncrementalReceiver;
pub use log_surface::{LogErrorReporter, LogProgressBar, LogSurface};
pub use on_complete_receiver::OnCompleteReceiver;
pub use render_surface::{ErrorReporter, ProgressReporter, RenderSurface};
pub use rpc_observer::RpcObserver;
pub use streaming_receiver::StreamingReceiver;
