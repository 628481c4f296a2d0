use crate::request::RpcEvent;

/// Consumer of a streaming request's events.
///
/// Events are delivered in arrival order from the request's driver. Any
/// `FnMut(RpcEvent<T>)` closure is an observer.
pub trait RpcObserver<T>: Send {
    fn on_event(&mut self, event: RpcEvent<T>);
}

impl<T, F> RpcObserver<T> for F
where
    F: FnMut(RpcEvent<T>) + Send,
{
    fn on_event(&mut self, event: RpcEvent<T>) {
        self(event)
    }
}
