use beacon_core::{PeerId, RoomId};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("peer transport is closed")]
pub struct SendError;

/// Outbound half of a transport connection.
///
/// Implementations must not block: the relay hands a frame over and moves on.
/// Any queueing or backpressure belongs to the transport.
pub trait PeerSink: Send + Sync {
    fn send(&self, frame: &str) -> Result<(), SendError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionIdentity {
    pub id: PeerId,
    /// `None` places the connection in the global room.
    pub room: Option<RoomId>,
    pub connected_at: Instant,
}

/// A live connection. Only the registry holds these.
pub struct Connection {
    identity: ConnectionIdentity,
    sink: Box<dyn PeerSink>,
}

impl Connection {
    pub(crate) fn new(identity: ConnectionIdentity, sink: Box<dyn PeerSink>) -> Self {
        Self { identity, sink }
    }

    pub fn identity(&self) -> &ConnectionIdentity {
        &self.identity
    }

    pub fn send(&self, frame: &str) -> Result<(), SendError> {
        self.sink.send(frame)
    }
}
