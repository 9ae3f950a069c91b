use crate::error::SignalingError;
use crate::hub::{HubCommand, HubStats};
use crate::registry::{ConnectionIdentity, ConnectionRegistry, PeerSink};
use crate::room::{JoinOutcome, MembershipIndex};
use crate::signaling::PresenceNotifier;
use beacon_core::{PeerId, RoomId};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Single owner of registry and membership mutation.
///
/// Commands are applied one at a time, so a join always sees a settled set of
/// occupants and a teardown can only happen once.
pub struct SignalingHub {
    registry: ConnectionRegistry,
    membership: MembershipIndex,
    notifier: PresenceNotifier,
    command_rx: mpsc::Receiver<HubCommand>,
    auto_join: bool,
}

impl SignalingHub {
    pub fn new(
        registry: ConnectionRegistry,
        command_rx: mpsc::Receiver<HubCommand>,
        auto_join: bool,
    ) -> Self {
        Self {
            notifier: PresenceNotifier::new(registry.clone()),
            registry,
            membership: MembershipIndex::new(),
            command_rx,
            auto_join,
        }
    }

    pub async fn run(mut self) {
        info!("Signaling hub started");

        loop {
            match self.command_rx.recv().await {
                Some(cmd) => self.handle_command(cmd),
                None => {
                    info!("Command channel closed. Shutting down hub.");
                    break;
                }
            }
        }

        info!("Signaling hub finished");
    }

    fn handle_command(&mut self, cmd: HubCommand) {
        match cmd {
            HubCommand::Connect { room, sink, reply } => {
                let result = self.connect(room, sink);

                // The transport gave up while waiting; undo the registration.
                if let Err(Ok(identity)) = reply.send(result) {
                    warn!(
                        "Connection {} went away during registration",
                        identity.id
                    );
                    self.teardown(identity.id);
                }
            }

            HubCommand::Join { peer_id } => self.join(peer_id),

            HubCommand::Leave { peer_id } => {
                info!("Peer {} left", peer_id);
                self.teardown(peer_id);
            }

            HubCommand::Disconnect { peer_id } => self.teardown(peer_id),

            HubCommand::Stats { reply } => {
                let _ = reply.send(HubStats {
                    connections: self.registry.len(),
                    rooms: self.membership.room_count(),
                });
            }
        }
    }

    fn connect(
        &mut self,
        room: Option<RoomId>,
        sink: Box<dyn PeerSink>,
    ) -> Result<ConnectionIdentity, SignalingError> {
        let identity = self.registry.register(sink, room)?;
        info!(
            "Peer {} connected. Total connections: {}",
            identity.id,
            self.registry.len()
        );

        if self.auto_join {
            self.join(identity.id);
        }

        Ok(identity)
    }

    fn join(&mut self, peer_id: PeerId) {
        let Some(conn) = self.registry.resolve(peer_id) else {
            debug!("Ignoring join from unregistered peer {}", peer_id);
            return;
        };
        let room = conn.identity().room.clone();
        drop(conn);

        match self.membership.join(peer_id, room.clone()) {
            JoinOutcome::Joined { occupants } => {
                info!(
                    "Peer {} joined room {} with {} other(s)",
                    peer_id,
                    room_label(room.as_ref()),
                    occupants.len()
                );
                self.notifier.announce_join(peer_id, &occupants);
            }
            JoinOutcome::AlreadyJoined { room } => {
                debug!(
                    "Peer {} is already in room {}",
                    peer_id,
                    room_label(room.as_ref())
                );
            }
        }
    }

    /// Unregisters, leaves and announces. Safe to call any number of times.
    fn teardown(&mut self, peer_id: PeerId) {
        let removed = self.registry.unregister(peer_id);
        let departure = self.membership.leave(peer_id);

        if let Some(departure) = departure {
            let reached = self
                .notifier
                .announce_leave(peer_id, &departure.remaining);
            info!(
                "Peer {} removed from room {}; notified {}/{}",
                peer_id,
                room_label(departure.room.as_ref()),
                reached,
                departure.remaining.len()
            );
        }

        if removed.is_some() {
            info!(
                "Peer {} disconnected. Total connections: {}",
                peer_id,
                self.registry.len()
            );
        }
    }
}

fn room_label(room: Option<&RoomId>) -> &str {
    room.map(RoomId::as_str).unwrap_or("<global>")
}
