use crate::error::SignalingError;
use crate::registry::{ConnectionIdentity, PeerSink};
use beacon_core::{PeerId, RoomId};
use tokio::sync::oneshot;

/// Counters reported by the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubStats {
    pub connections: usize,
    pub rooms: usize,
}

/// Everything that changes registry or membership state goes through the hub
/// as one of these.
pub enum HubCommand {
    /// A transport connection was accepted and authenticated.
    Connect {
        room: Option<RoomId>,
        sink: Box<dyn PeerSink>,
        reply: oneshot::Sender<Result<ConnectionIdentity, SignalingError>>,
    },

    /// Client sent `join`.
    Join { peer_id: PeerId },

    /// Client sent `leave`.
    Leave { peer_id: PeerId },

    /// Transport closed, for whatever reason.
    Disconnect { peer_id: PeerId },

    Stats { reply: oneshot::Sender<HubStats> },
}
