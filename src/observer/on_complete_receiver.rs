use super::{RpcObserver, StreamingReceiver};
use crate::request::RpcEvent;

/// Buffering observer: keeps only the most recent payload and hands it to
/// `run` once the stream completes.
///
/// Suitable for operations whose useful output is a single terminal value.
/// `run` is invoked at most once, and never if no payload arrived or the
/// stream failed.
pub struct OnCompleteReceiver<T, F> {
    receiver: StreamingReceiver,
    value: Option<T>,
    run: Option<F>,
}

impl<T, F> OnCompleteReceiver<T, F>
where
    F: FnOnce(T),
{
    pub fn new(receiver: StreamingReceiver, run: F) -> Self {
        Self {
            receiver,
            value: None,
            run: Some(run),
        }
    }

    pub fn receiver(&self) -> &StreamingReceiver {
        &self.receiver
    }

    /// The payload that would be handed to `run` if the stream completed now.
    pub fn latest(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

impl<T, F> RpcObserver<T> for OnCompleteReceiver<T, F>
where
    T: Send,
    F: FnOnce(T) + Send,
{
    fn on_event(&mut self, event: RpcEvent<T>) {
        match event {
            RpcEvent::Progress(partial) => {
                if self.receiver.is_finished() {
                    return;
                }
                self.receiver.on_next(&partial);
                if let Some(data) = partial.data {
                    self.value = Some(data);
                }
            }
            RpcEvent::Error(message) => {
                self.receiver.on_error(&message);
                self.value = None;
            }
            RpcEvent::Completed => {
                if self.receiver.is_finished() {
                    return;
                }
                self.receiver.on_completed();
                if let (Some(value), Some(run)) = (self.value.take(), self.run.take()) {
                    run(value);
                }
            }
        }
    }
}
