use crate::error::SignalingError;
use crate::registry::{ConnectionRegistry, DeliveryError};
use beacon_core::{InboundEnvelope, MessageKind, PeerId, SignalMessage};
use tracing::{debug, warn};

/// What the router did with an inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// A directed message was handed to its target.
    Delivered { kind: MessageKind, target: PeerId },
    /// The sender asked to join its room.
    Join,
    /// The sender asked to leave.
    Leave,
}

/// Validates inbound frames and relays directed messages.
///
/// Presence requests are only recognised here; applying them is the hub's job
/// because they must be ordered with every other membership change.
#[derive(Clone)]
pub struct MessageRouter {
    registry: ConnectionRegistry,
}

impl MessageRouter {
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self { registry }
    }

    /// Routes one frame from `sender`.
    ///
    /// Malformed frames and protocol violations are reported back to the sender
    /// as an `error` frame. An unresolved target is returned as an error but
    /// never reported.
    pub fn route(&self, sender: PeerId, frame: &[u8]) -> Result<Routed, SignalingError> {
        if !self.registry.contains(sender) {
            return Err(SignalingError::NotRegistered(sender));
        }

        let result = self.dispatch(sender, frame);
        if let Err(
            e @ (SignalingError::MalformedMessage(_) | SignalingError::ProtocolViolation(_)),
        ) = &result
        {
            self.report(sender, e);
        }
        result
    }

    fn dispatch(&self, sender: PeerId, frame: &[u8]) -> Result<Routed, SignalingError> {
        let envelope = InboundEnvelope::parse(frame)
            .map_err(|e| SignalingError::MalformedMessage(e.to_string()))?;

        let kind = envelope
            .message_kind()
            .map_err(|e| SignalingError::ProtocolViolation(e.to_string()))?;

        debug!("Message from {}: {}", sender, kind);

        match kind {
            MessageKind::Join => Ok(Routed::Join),
            MessageKind::Leave => Ok(Routed::Leave),
            MessageKind::Offer | MessageKind::Answer | MessageKind::IceCandidate => {
                self.relay(sender, kind, envelope)
            }
            other => Err(SignalingError::ProtocolViolation(format!(
                "'{}' may only be sent by the server",
                other
            ))),
        }
    }

    fn relay(
        &self,
        sender: PeerId,
        kind: MessageKind,
        envelope: InboundEnvelope,
    ) -> Result<Routed, SignalingError> {
        let Some(target) = envelope.target else {
            return Err(SignalingError::MalformedMessage(format!(
                "'{}' requires a target",
                kind
            )));
        };
        let Some(payload) = envelope.payload else {
            return Err(SignalingError::MalformedMessage(format!(
                "'{}' requires a payload",
                kind
            )));
        };

        let Some(msg) = SignalMessage::relay(kind, sender, target, payload) else {
            return Err(SignalingError::ProtocolViolation(format!(
                "'{}' is not a directed message",
                kind
            )));
        };
        let json = msg
            .to_json()
            .map_err(|e| SignalingError::MalformedMessage(e.to_string()))?;

        match self.registry.deliver(target, &json) {
            Ok(()) => Ok(Routed::Delivered { kind, target }),
            Err(DeliveryError::NotFound) => Err(SignalingError::UnresolvedTarget(target)),
            Err(DeliveryError::Closed(_)) => {
                // Target is mid-teardown; same outcome as already gone.
                Err(SignalingError::UnresolvedTarget(target))
            }
        }
    }

    fn report(&self, sender: PeerId, err: &SignalingError) {
        warn!("Rejected message from {}: {}", sender, err);

        let msg = SignalMessage::Error {
            message: err.to_string(),
        };
        let Ok(json) = msg.to_json() else {
            return;
        };
        if let Err(e) = self.registry.deliver(sender, &json) {
            debug!("Could not report error to {}: {}", sender, e);
        }
    }
}
