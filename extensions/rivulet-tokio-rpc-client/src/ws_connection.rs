use rivulet::request::RpcConnection;
use tokio::sync::mpsc::UnboundedSender;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;

/// The request-owned half of a WebSocket: outbound messages are queued to the
/// send loop, which owns the actual sink.
pub(crate) struct WsConnection {
    tx: UnboundedSender<WsMessage>,
}

impl WsConnection {
    pub(crate) fn new(tx: UnboundedSender<WsMessage>) -> Self {
        Self { tx }
    }
}

impl RpcConnection for WsConnection {
    fn send_text(&mut self, text: String) {
        // Only fails once the send loop is gone, in which case the read loop
        // is about to report the close.
        let _ = self.tx.send(WsMessage::Text(text.into()));
    }

    fn close(&mut self) {
        let _ = self.tx.send(WsMessage::Close(None));
    }
}
