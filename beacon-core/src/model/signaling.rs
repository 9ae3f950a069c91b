use crate::model::envelope::MessageKind;
use crate::model::peer::PeerId;
use serde::Serialize;
use serde_json::value::RawValue;

/// Frames the relay writes to a connection.
///
/// Directed variants carry the client's `payload` as raw JSON text so it
/// leaves the relay exactly as it arrived.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum SignalMessage {
    Offer {
        from: PeerId,
        target: PeerId,
        payload: Box<RawValue>,
    },
    Answer {
        from: PeerId,
        target: PeerId,
        payload: Box<RawValue>,
    },
    IceCandidate {
        from: PeerId,
        target: PeerId,
        payload: Box<RawValue>,
    },
    PeerList {
        peer_ids: Vec<PeerId>,
    },
    NewPeer {
        peer_id: PeerId,
    },
    PeerDisconnected {
        peer_id: PeerId,
    },
    IdAssignment {
        id: PeerId,
    },
    Error {
        message: String,
    },
}

impl SignalMessage {
    /// Builds the relayed form of a directed message. Returns `None` for kinds
    /// that are not directed.
    pub fn relay(
        kind: MessageKind,
        from: PeerId,
        target: PeerId,
        payload: Box<RawValue>,
    ) -> Option<Self> {
        let msg = match kind {
            MessageKind::Offer => Self::Offer {
                from,
                target,
                payload,
            },
            MessageKind::Answer => Self::Answer {
                from,
                target,
                payload,
            },
            MessageKind::IceCandidate => Self::IceCandidate {
                from,
                target,
                payload,
            },
            _ => return None,
        };
        Some(msg)
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Offer { .. } => MessageKind::Offer,
            Self::Answer { .. } => MessageKind::Answer,
            Self::IceCandidate { .. } => MessageKind::IceCandidate,
            Self::PeerList { .. } => MessageKind::PeerList,
            Self::NewPeer { .. } => MessageKind::NewPeer,
            Self::PeerDisconnected { .. } => MessageKind::PeerDisconnected,
            Self::IdAssignment { .. } => MessageKind::IdAssignment,
            Self::Error { .. } => MessageKind::Error,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
