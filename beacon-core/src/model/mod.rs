mod envelope;
mod peer;
mod room;
mod signaling;

pub use envelope::{InboundEnvelope, MessageKind, UnknownMessageKind};
pub use peer::PeerId;
pub use room::RoomId;
pub use signaling::SignalMessage;
