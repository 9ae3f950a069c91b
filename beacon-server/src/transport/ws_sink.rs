use crate::registry::{PeerSink, SendError};
use axum::extract::ws::Message;
use tokio::sync::mpsc;

/// Feeds the write half of a WebSocket through an unbounded queue, so the
/// relay never waits on a slow socket.
pub struct WsSink {
    tx: mpsc::UnboundedSender<Message>,
}

impl WsSink {
    pub fn new(tx: mpsc::UnboundedSender<Message>) -> Self {
        Self { tx }
    }
}

impl PeerSink for WsSink {
    fn send(&self, frame: &str) -> Result<(), SendError> {
        self.tx
            .send(Message::Text(frame.into()))
            .map_err(|_| SendError)
    }
}
