//! Note: This `RpcServer` is a reference implementation and does not include
//! authentication or authorization mechanisms. It serves one streaming call
//! per WebSocket connection: the client sends a single request envelope, the
//! server streams reply envelopes and closes the connection when the call is
//! over.

use crate::rpc_handler::{ReplyStream, RpcCallContext, RpcStreamHandler};
use axum::{
    Router,
    extract::ConnectInfo,
    extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};
use futures_util::stream::{self, SplitSink, SplitStream};
use futures_util::{SinkExt, Stream, StreamExt};
use rivulet::constants::RPC_REQUEST_PATH;
use rivulet::remote::RemoteObjectId;
use rivulet::wire::{CloseCode, PartialResult, ReplyEnvelope, RequestEnvelope};
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{
    net::{TcpListener, ToSocketAddrs},
    sync::RwLock,
};

type WsSender = SplitSink<WebSocket, Message>;

enum CallProgress {
    Streaming,
    Finished,
    Cancelled,
    Disconnected,
}

/// An RPC server that answers streaming calls over WebSockets at `/rpc`.
pub struct RpcServer {
    handlers: Arc<RwLock<HashMap<String, RpcStreamHandler>>>,
}

impl Default for RpcServer {
    fn default() -> Self {
        Self::new()
    }
}

impl RpcServer {
    pub fn new() -> Self {
        RpcServer {
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers the handler serving `method`, replacing any previous one.
    ///
    /// The handler is called once per request and returns the stream of
    /// partial results to send back.
    pub async fn register<F, S>(&self, method: &str, handler: F)
    where
        F: Fn(RpcCallContext) -> S + Send + Sync + 'static,
        S: Stream<Item = Result<PartialResult<Value>, String>> + Send + 'static,
    {
        let handler: RpcStreamHandler = Arc::new(move |context| handler(context).boxed());
        self.handlers
            .write()
            .await
            .insert(method.to_string(), handler);
    }

    /// Binds to an address and starts the RPC server.
    pub async fn serve<A: ToSocketAddrs>(self, addr: A) -> Result<SocketAddr, axum::BoxError> {
        let listener = TcpListener::bind(addr).await?;
        let server = Arc::new(self);
        server.serve_with_listener(listener).await
    }

    /// Starts the RPC server with a pre-bound `TcpListener`, e.g. one bound
    /// to an ephemeral port.
    pub async fn serve_with_listener(
        self: Arc<Self>,
        listener: TcpListener,
    ) -> Result<SocketAddr, axum::BoxError> {
        let address = listener.local_addr()?;
        let app = Router::new().route(
            &format!("/{}", RPC_REQUEST_PATH),
            get({
                let server = self.clone();
                move |ws, conn| Self::ws_handler(ws, conn, server)
            }),
        );
        tracing::info!("Server running on {:?}", address);
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;
        Ok(address)
    }

    async fn ws_handler(
        ws: WebSocketUpgrade,
        ConnectInfo(addr): ConnectInfo<SocketAddr>,
        server: Arc<RpcServer>,
    ) -> impl IntoResponse {
        tracing::debug!("Client connected: {}", addr);
        ws.on_upgrade(move |socket| server.handle_socket(socket, addr))
    }

    async fn handle_socket(self: Arc<Self>, socket: WebSocket, addr: SocketAddr) {
        let (mut sender, mut receiver) = socket.split();

        // The first text message is the request envelope.
        let envelope = loop {
            match receiver.next().await {
                Some(Ok(Message::Text(text))) => break RequestEnvelope::from_json(text.as_str()),
                Some(Ok(Message::Close(_))) => {
                    // Finish the closing handshake so the client sees its own close.
                    tracing::debug!("Client {} closed before sending a request.", addr);
                    Self::drain(receiver).await;
                    return;
                }
                Some(Err(_)) | None => {
                    tracing::debug!("Client {} left before sending a request.", addr);
                    return;
                }
                Some(Ok(_)) => continue,
            }
        };

        let envelope = match envelope {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::warn!("Malformed request from {}: {}", addr, err);
                Self::close(&mut sender, CloseCode::Unsupported).await;
                Self::drain(receiver).await;
                return;
            }
        };
        tracing::debug!(
            "Request #{} from {}: {}.{}",
            envelope.request_id,
            addr,
            envelope.object_id,
            envelope.method
        );

        let mut replies = match self.resolve(&envelope).await {
            Ok(replies) => replies,
            Err(message) => stream::once(async move { Err(message) }).boxed(),
        };

        loop {
            let progress = tokio::select! {
                item = replies.next() => match item {
                    Some(Ok(partial)) => {
                        let reply = match ReplyEnvelope::success(&partial) {
                            Ok(reply) => reply,
                            Err(err) => ReplyEnvelope::error(err.to_string()),
                        };
                        if Self::send_reply(&mut sender, &reply).await {
                            CallProgress::Streaming
                        } else {
                            CallProgress::Disconnected
                        }
                    }
                    Some(Err(message)) => {
                        tracing::error!("Request #{} failed: {}", envelope.request_id, message);
                        if Self::send_reply(&mut sender, &ReplyEnvelope::error(message)).await {
                            CallProgress::Finished
                        } else {
                            CallProgress::Disconnected
                        }
                    }
                    None => CallProgress::Finished,
                },
                msg = receiver.next() => match msg {
                    Some(Ok(Message::Close(_))) => CallProgress::Cancelled,
                    Some(Err(_)) | None => CallProgress::Disconnected,
                    Some(Ok(_)) => CallProgress::Streaming,
                },
            };

            match progress {
                CallProgress::Streaming => continue,
                CallProgress::Finished => break,
                CallProgress::Cancelled => {
                    // Keep reading so the close reply is flushed.
                    tracing::debug!("Client {} cancelled request #{}.", addr, envelope.request_id);
                    Self::drain(receiver).await;
                    return;
                }
                CallProgress::Disconnected => {
                    tracing::debug!("Client {} disconnected.", addr);
                    return;
                }
            }
        }

        Self::close(&mut sender, CloseCode::Normal).await;
        Self::drain(receiver).await;
        tracing::debug!("Terminated connection for {}.", addr);
    }

    /// Looks up the handler for the envelope's method and starts it.
    async fn resolve(&self, envelope: &RequestEnvelope) -> Result<ReplyStream, String> {
        envelope.check_proto_version().map_err(|err| err.to_string())?;
        let arguments: Value = envelope
            .decode_arguments()
            .map_err(|err| format!("Invalid arguments: {}", err))?;

        let handler = self
            .handlers
            .read()
            .await
            .get(&envelope.method)
            .cloned()
            .ok_or_else(|| {
                format!(
                    "No method {} on object {}",
                    envelope.method, envelope.object_id
                )
            })?;

        Ok(handler(RpcCallContext {
            object_id: RemoteObjectId::new(envelope.object_id.clone()),
            method: envelope.method.clone(),
            arguments,
            request_id: envelope.request_id,
        }))
    }

    async fn send_reply(sender: &mut WsSender, reply: &ReplyEnvelope) -> bool {
        let text = match reply.to_json() {
            Ok(text) => text,
            Err(err) => {
                tracing::error!("Failed to encode reply: {}", err);
                return false;
            }
        };
        sender.send(Message::Text(text.into())).await.is_ok()
    }

    async fn close(sender: &mut WsSender, code: CloseCode) {
        let frame = CloseFrame {
            code: code.value(),
            reason: String::new().into(),
        };
        let _ = sender.send(Message::Close(Some(frame))).await;
    }

    /// Reads until the peer finishes the closing handshake.
    async fn drain(mut receiver: SplitStream<WebSocket>) {
        while let Some(Ok(_)) = receiver.next().await {}
    }
}
