use crate::ws_connection::WsConnection;
use chrono::{DateTime, Utc};
use futures_util::{SinkExt, StreamExt};
use rivulet::constants::{ABNORMAL_CLOSE_CODE, NO_STATUS_CLOSE_CODE};
use rivulet::observer::RpcObserver;
use rivulet::request::{
    Cancellable, OpenOutcome, RequestState, RpcEvent, RpcRequestError, StreamingRequest,
};
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message as WsMessage};

/// A streaming request bound to an endpoint, ready to be invoked.
///
/// Clones share the same underlying request, so one clone can be handed to a
/// progress control as its cancellation handle while another is invoked.
#[derive(Clone)]
pub struct RpcCall {
    request: Arc<Mutex<StreamingRequest>>,
    url: String,
}

impl RpcCall {
    pub(crate) fn new(request: StreamingRequest, url: String) -> Self {
        Self {
            request: Arc::new(Mutex::new(request)),
            url,
        }
    }

    fn lock(&self) -> MutexGuard<'_, StreamingRequest> {
        lock_request(&self.request)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn request_id(&self) -> u64 {
        self.lock().request_id()
    }

    pub fn state(&self) -> RequestState {
        self.lock().state()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_closed()
    }

    pub fn is_cancelled(&self) -> bool {
        self.lock().is_cancelled()
    }

    pub fn set_start_time(&self, start: Option<DateTime<Utc>>) {
        self.lock().set_start_time(start);
    }

    /// Continues the timing of `previous`. Must be called before invoking;
    /// later calls are ignored.
    pub fn chain(&self, previous: Option<&dyn Cancellable>) {
        // Read first: `previous` may share this call's lock.
        let start = previous.map(|previous| previous.start_time());
        if let Some(start) = start {
            self.lock().set_start_time(start);
        }
    }

    /// The request as a cancellation handle for progress controls.
    pub fn as_cancellable(&self) -> Arc<dyn Cancellable> {
        self.request.clone()
    }

    /// Runs the call, delivering every event to `observer`.
    ///
    /// Returns as soon as the connection task is spawned; everything after
    /// that happens on the task. Must be called from within a Tokio runtime.
    pub fn invoke<T, O>(&self, observer: O) -> Result<JoinHandle<()>, RpcRequestError>
    where
        T: DeserializeOwned + Send + 'static,
        O: RpcObserver<T> + 'static,
    {
        self.lock().begin_invoke()?;
        let request = self.request.clone();
        let url = self.url.clone();
        Ok(tokio::spawn(drive(request, url, observer)))
    }

    /// Runs the call, delivering events through a channel instead of an
    /// observer. The channel closes after the last event.
    pub fn invoke_channel<T>(
        &self,
    ) -> Result<(JoinHandle<()>, UnboundedReceiver<RpcEvent<T>>), RpcRequestError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let (tx, rx) = unbounded_channel();
        let handle = self.invoke(ChannelObserver::new(tx))?;
        Ok((handle, rx))
    }
}

impl Cancellable for RpcCall {
    fn cancel(&self) -> bool {
        self.lock().cancel()
    }

    fn start_time(&self) -> Option<DateTime<Utc>> {
        self.lock().start_time()
    }
}

/// Forwards events into an unbounded channel.
pub struct ChannelObserver<T> {
    tx: UnboundedSender<RpcEvent<T>>,
}

impl<T> ChannelObserver<T> {
    pub fn new(tx: UnboundedSender<RpcEvent<T>>) -> Self {
        Self { tx }
    }
}

impl<T: Send> RpcObserver<T> for ChannelObserver<T> {
    fn on_event(&mut self, event: RpcEvent<T>) {
        // A dropped receiver means nobody is listening any more.
        let _ = self.tx.send(event);
    }
}

fn lock_request(request: &Mutex<StreamingRequest>) -> MutexGuard<'_, StreamingRequest> {
    request.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Connection task: opens the socket, hands it to the request and feeds every
/// connection event through the request's state machine.
///
/// The request lock is never held while the observer runs, so observers may
/// cancel the call from inside a callback.
async fn drive<T, O>(request: Arc<Mutex<StreamingRequest>>, url: String, mut observer: O)
where
    T: DeserializeOwned + Send + 'static,
    O: RpcObserver<T>,
{
    let ws_stream = match connect_async(url.as_str()).await {
        Ok((ws_stream, _)) => ws_stream,
        Err(err) => {
            tracing::warn!("Failed to connect to {}: {}", url, err);
            let event = lock_request(&request).handle_transport_error::<T>(Some(err.to_string()));
            if let Some(event) = event {
                observer.on_event(event);
            }
            return;
        }
    };
    let (mut sender, mut receiver) = ws_stream.split();
    let (tx, mut rx) = unbounded_channel::<WsMessage>();

    // Send loop. Ends when the request releases its connection.
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let opened = lock_request(&request).handle_open(Box::new(WsConnection::new(tx)));
    match opened {
        Ok(OpenOutcome::Sent) | Ok(OpenOutcome::Cancelled) => {}
        Err(err) => {
            tracing::error!("Failed to send request to {}: {}", url, err);
            let event = lock_request(&request).handle_transport_error::<T>(Some(err.to_string()));
            if let Some(event) = event {
                observer.on_event(event);
            }
            send_task.abort();
            return;
        }
    }

    // Read loop. After a close frame the stream is polled once more so the
    // close reply is flushed; it then ends with `None`.
    let mut close_code = None;
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(WsMessage::Text(text)) => {
                let event = lock_request(&request).handle_message::<T>(text.as_str());
                if let Some(event) = event {
                    observer.on_event(event);
                }
            }
            Ok(WsMessage::Binary(bytes)) => match std::str::from_utf8(&bytes) {
                Ok(text) => {
                    let event = lock_request(&request).handle_message::<T>(text);
                    if let Some(event) = event {
                        observer.on_event(event);
                    }
                }
                Err(_) => tracing::warn!("Ignoring non UTF-8 binary frame from {}", url),
            },
            Ok(WsMessage::Close(frame)) => {
                close_code = Some(
                    frame
                        .map(|frame| u16::from(frame.code))
                        .unwrap_or(NO_STATUS_CLOSE_CODE),
                );
            }
            Ok(_) => {} // Ping/pong are answered by the protocol layer.
            Err(err) => {
                tracing::debug!("Connection to {} failed: {}", url, err);
                break;
            }
        }
    }

    let events = lock_request(&request).handle_close::<T>(close_code.unwrap_or(ABNORMAL_CLOSE_CODE));
    for event in events {
        observer.on_event(event);
    }
    send_task.abort();
}
