use beacon_server::{PeerSink, SendError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

/// PeerSink that forwards every frame to a test-side channel.
#[derive(Clone)]
pub struct MockPeerSink {
    tx: mpsc::UnboundedSender<String>,
    /// When set, every send fails as if the transport had died.
    failing: Arc<AtomicBool>,
}

impl MockPeerSink {
    /// Create a new MockPeerSink and its receiver channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = Self {
            tx,
            failing: Arc::new(AtomicBool::new(false)),
        };
        (sink, rx)
    }

    /// Handle for breaking the sink after it has been handed to the hub.
    pub fn switch(&self) -> FailSwitch {
        FailSwitch(self.failing.clone())
    }
}

/// Makes a MockPeerSink start or stop failing without keeping its channel open.
#[derive(Clone)]
pub struct FailSwitch(Arc<AtomicBool>);

impl FailSwitch {
    pub fn set_failing(&self, failing: bool) {
        self.0.store(failing, Ordering::SeqCst);
    }
}

impl PeerSink for MockPeerSink {
    fn send(&self, frame: &str) -> Result<(), SendError> {
        if self.failing.load(Ordering::SeqCst) {
            tracing::debug!("[MockPeerSink] dropping frame on failing sink");
            return Err(SendError);
        }
        self.tx.send(frame.to_string()).map_err(|_| SendError)
    }
}
