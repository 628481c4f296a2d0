use super::{RpcObserver, StreamingReceiver};
use crate::request::RpcEvent;
use crate::wire::PartialResult;

/// A [`StreamingReceiver`] that also redraws on every partial result.
///
/// `render` receives each partial result together with the elapsed time of
/// the operation; the progress indicator is still driven and dismissed by the
/// wrapped receiver.
pub struct IncrementalReceiver<F> {
    receiver: StreamingReceiver,
    render: F,
}

impl<F> IncrementalReceiver<F> {
    pub fn new(receiver: StreamingReceiver, render: F) -> Self {
        Self { receiver, render }
    }

    pub fn receiver(&self) -> &StreamingReceiver {
        &self.receiver
    }
}

impl<T, F> RpcObserver<T> for IncrementalReceiver<F>
where
    F: FnMut(&PartialResult<T>, Option<i64>) + Send,
{
    fn on_event(&mut self, event: RpcEvent<T>) {
        match event {
            RpcEvent::Progress(partial) => {
                if self.receiver.is_finished() {
                    return;
                }
                self.receiver.on_next(&partial);
                (self.render)(&partial, self.receiver.elapsed_milliseconds());
            }
            RpcEvent::Error(message) => self.receiver.on_error(&message),
            RpcEvent::Completed => self.receiver.on_completed(),
        }
    }
}
