use beacon_core::PeerId;

#[derive(Debug, thiserror::Error)]
pub enum SignalingError {
    /// The frame could not be parsed, or a required field was missing.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// Unknown `type` tag, or a tag only the relay may send.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// A directed message named a peer that is no longer connected.
    #[error("target {0} is not connected")]
    UnresolvedTarget(PeerId),

    /// The sender has already been torn down.
    #[error("connection {0} is not registered")]
    NotRegistered(PeerId),

    #[error("connection limit of {0} reached")]
    RegistryFull(usize),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("signaling hub is not running")]
    HubUnavailable,
}
