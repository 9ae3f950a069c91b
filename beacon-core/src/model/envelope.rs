use crate::model::peer::PeerId;
use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;
use std::fmt;
use std::str::FromStr;

/// Every `type` tag the protocol knows about, in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Join,
    Leave,
    Offer,
    Answer,
    IceCandidate,
    PeerList,
    NewPeer,
    PeerDisconnected,
    IdAssignment,
    Error,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::Leave => "leave",
            Self::Offer => "offer",
            Self::Answer => "answer",
            Self::IceCandidate => "ice-candidate",
            Self::PeerList => "peer-list",
            Self::NewPeer => "new-peer",
            Self::PeerDisconnected => "peer-disconnected",
            Self::IdAssignment => "id-assignment",
            Self::Error => "error",
        }
    }

    /// Offer, answer and ice-candidate travel to exactly one target.
    pub fn is_directed(&self) -> bool {
        matches!(self, Self::Offer | Self::Answer | Self::IceCandidate)
    }

    /// Kinds a client is allowed to send. The rest are emitted by the relay only.
    pub fn is_client_originated(&self) -> bool {
        matches!(self, Self::Join | Self::Leave) || self.is_directed()
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown message type '{0}'")]
pub struct UnknownMessageKind(pub String);

impl FromStr for MessageKind {
    type Err = UnknownMessageKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "join" => Self::Join,
            "leave" => Self::Leave,
            "offer" => Self::Offer,
            "answer" => Self::Answer,
            "ice-candidate" => Self::IceCandidate,
            "peer-list" => Self::PeerList,
            "new-peer" => Self::NewPeer,
            "peer-disconnected" => Self::PeerDisconnected,
            "id-assignment" => Self::IdAssignment,
            "error" => Self::Error,
            other => return Err(UnknownMessageKind(other.to_string())),
        };
        Ok(kind)
    }
}

/// A frame as received from a client.
///
/// The `type` tag stays a string here so an unknown tag can be told apart from
/// an unparseable frame. Any client-supplied `from` is not read at all.
/// `payload` is `None` only when the field is absent; a literal `null` is
/// kept as raw text so it can be forwarded.
#[derive(Debug, Deserialize)]
pub struct InboundEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub target: Option<PeerId>,
    #[serde(default, deserialize_with = "present_raw")]
    pub payload: Option<Box<RawValue>>,
}

fn present_raw<'de, D>(deserializer: D) -> Result<Option<Box<RawValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Box::<RawValue>::deserialize(deserializer).map(Some)
}

impl InboundEnvelope {
    pub fn parse(frame: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(frame)
    }

    pub fn message_kind(&self) -> Result<MessageKind, UnknownMessageKind> {
        self.kind.parse()
    }
}
