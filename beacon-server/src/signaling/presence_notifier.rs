use crate::registry::{ConnectionRegistry, DeliveryError};
use beacon_core::{PeerId, SignalMessage};
use tracing::{debug, error, warn};

/// Tells peers about arrivals and departures in their room.
///
/// Every recipient is attempted independently; a dead recipient never stops
/// the rest of a fan-out.
#[derive(Clone)]
pub struct PresenceNotifier {
    registry: ConnectionRegistry,
}

impl PresenceNotifier {
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self { registry }
    }

    /// Sends the newcomer its id and the current occupant list, then announces
    /// it to each occupant. Returns how many occupants were reached.
    pub fn announce_join(&self, new_id: PeerId, existing: &[PeerId]) -> usize {
        self.send_signal(new_id, &SignalMessage::IdAssignment { id: new_id });
        self.send_signal(
            new_id,
            &SignalMessage::PeerList {
                peer_ids: existing.to_vec(),
            },
        );

        self.fan_out(&SignalMessage::NewPeer { peer_id: new_id }, existing)
    }

    /// Returns how many of `remaining` were reached.
    pub fn announce_leave(&self, left_id: PeerId, remaining: &[PeerId]) -> usize {
        self.fan_out(
            &SignalMessage::PeerDisconnected { peer_id: left_id },
            remaining,
        )
    }

    fn fan_out(&self, msg: &SignalMessage, recipients: &[PeerId]) -> usize {
        let json = match msg.to_json() {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize {} notification: {}", msg.kind(), e);
                return 0;
            }
        };

        recipients
            .iter()
            .filter(|&&peer_id| self.deliver(peer_id, &json, msg))
            .count()
    }

    fn send_signal(&self, peer_id: PeerId, msg: &SignalMessage) -> bool {
        match msg.to_json() {
            Ok(json) => self.deliver(peer_id, &json, msg),
            Err(e) => {
                error!("Failed to serialize {} notification: {}", msg.kind(), e);
                false
            }
        }
    }

    fn deliver(&self, peer_id: PeerId, json: &str, msg: &SignalMessage) -> bool {
        match self.registry.deliver(peer_id, json) {
            Ok(()) => true,
            Err(DeliveryError::NotFound) => {
                debug!("Skipping {} for departed peer {}", msg.kind(), peer_id);
                false
            }
            Err(DeliveryError::Closed(e)) => {
                warn!("Failed to send {} to {}: {}", msg.kind(), peer_id, e);
                false
            }
        }
    }
}
