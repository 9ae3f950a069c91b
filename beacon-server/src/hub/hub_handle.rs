use crate::auth::{AuthDecision, Authenticator, Credentials};
use crate::config::ServerConfig;
use crate::error::SignalingError;
use crate::hub::{HubCommand, HubStats, SignalingHub};
use crate::registry::{ConnectionIdentity, ConnectionRegistry, PeerSink};
use crate::signaling::{MessageRouter, Routed};
use beacon_core::{PeerId, RoomId};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

/// Cloneable front door to a running [`SignalingHub`].
///
/// Directed messages are routed on the caller's task. Anything that touches
/// membership is queued to the hub.
#[derive(Clone)]
pub struct HubHandle {
    command_tx: mpsc::Sender<HubCommand>,
    registry: ConnectionRegistry,
    router: MessageRouter,
    authenticator: Arc<dyn Authenticator>,
}

impl HubHandle {
    /// Starts a hub on the current runtime.
    pub fn spawn(config: &ServerConfig, authenticator: Arc<dyn Authenticator>) -> Self {
        let registry = ConnectionRegistry::new(config.max_connections);
        let (command_tx, command_rx) = mpsc::channel(config.hub_capacity);

        let hub = SignalingHub::new(registry.clone(), command_rx, config.auto_join);
        tokio::spawn(hub.run());

        Self {
            command_tx,
            router: MessageRouter::new(registry.clone()),
            registry,
            authenticator,
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub async fn authenticate(&self, credentials: &Credentials) -> Result<(), SignalingError> {
        match self.authenticator.authenticate(credentials).await {
            AuthDecision::Accepted => Ok(()),
            AuthDecision::Rejected => {
                info!(
                    "Authentication failed for user {:?}",
                    credentials.username.as_deref().unwrap_or("<none>")
                );
                Err(SignalingError::AuthenticationFailed)
            }
        }
    }

    /// Registers a connection and, unless joins are manual, places it in its
    /// room and announces it.
    ///
    /// The connection stays registered for as long as the returned lease is
    /// alive. If this future is dropped midway the registration is undone.
    pub async fn connect(
        &self,
        room: Option<RoomId>,
        sink: Box<dyn PeerSink>,
    ) -> Result<ConnectionLease, SignalingError> {
        let (reply, rx) = oneshot::channel();
        let mut pending = PendingConnect {
            hub: self.clone(),
            rx,
        };

        self.command_tx
            .send(HubCommand::Connect { room, sink, reply })
            .await
            .map_err(|_| SignalingError::HubUnavailable)?;

        let identity = (&mut pending.rx)
            .await
            .map_err(|_| SignalingError::HubUnavailable)??;

        Ok(ConnectionLease {
            hub: self.clone(),
            identity,
        })
    }

    /// Handles one inbound frame from `peer_id`.
    pub async fn handle_frame(&self, peer_id: PeerId, frame: &[u8]) {
        match self.router.route(peer_id, frame) {
            Ok(Routed::Delivered { kind, target }) => {
                debug!("Relayed {} from {} to {}", kind, peer_id, target);
            }
            Ok(Routed::Join) => self.submit(HubCommand::Join { peer_id }).await,
            Ok(Routed::Leave) => self.submit(HubCommand::Leave { peer_id }).await,
            Err(SignalingError::UnresolvedTarget(target)) => {
                debug!("Dropped message from {} to departed peer {}", peer_id, target);
            }
            Err(SignalingError::NotRegistered(_)) => {
                debug!("Dropped message from torn-down peer {}", peer_id);
            }
            // Already reported to the sender by the router.
            Err(_) => {}
        }
    }

    pub async fn disconnect(&self, peer_id: PeerId) {
        self.submit(HubCommand::Disconnect { peer_id }).await;
    }

    pub async fn stats(&self) -> Result<HubStats, SignalingError> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(HubCommand::Stats { reply })
            .await
            .map_err(|_| SignalingError::HubUnavailable)?;
        rx.await.map_err(|_| SignalingError::HubUnavailable)
    }

    async fn submit(&self, cmd: HubCommand) {
        if self.command_tx.send(cmd).await.is_err() {
            error!("Signaling hub is gone; command dropped");
        }
    }

    /// Non-async variant of [`HubHandle::disconnect`] for drop paths.
    fn release(&self, peer_id: PeerId) {
        match self.command_tx.try_send(HubCommand::Disconnect { peer_id }) {
            Ok(()) => {}
            Err(TrySendError::Full(cmd)) => {
                let tx = self.command_tx.clone();
                tokio::spawn(async move {
                    let _ = tx.send(cmd).await;
                });
            }
            Err(TrySendError::Closed(_)) => {
                warn!("Signaling hub is gone; could not release {}", peer_id);
            }
        }
    }
}

/// Disconnects its peer from the hub when dropped, on every exit path.
pub struct ConnectionLease {
    hub: HubHandle,
    identity: ConnectionIdentity,
}

impl ConnectionLease {
    pub fn identity(&self) -> &ConnectionIdentity {
        &self.identity
    }

    pub fn peer_id(&self) -> PeerId {
        self.identity.id
    }
}

impl fmt::Debug for ConnectionLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionLease")
            .field("identity", &self.identity)
            .finish()
    }
}

impl Drop for ConnectionLease {
    fn drop(&mut self) {
        self.hub.release(self.identity.id);
    }
}

/// Reply slot of an in-flight connect.
///
/// A reply that arrived but was never read is released here. A reply that
/// has not arrived yet fails to send once the slot is gone, and the hub rolls
/// the registration back itself.
struct PendingConnect {
    hub: HubHandle,
    rx: oneshot::Receiver<Result<ConnectionIdentity, SignalingError>>,
}

impl Drop for PendingConnect {
    fn drop(&mut self) {
        if let Ok(Ok(identity)) = self.rx.try_recv() {
            warn!("Connect for {} was abandoned; releasing it", identity.id);
            self.hub.release(identity.id);
        }
    }
}
