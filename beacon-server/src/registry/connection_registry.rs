use crate::error::SignalingError;
use crate::registry::{Connection, ConnectionIdentity, PeerSink, SendError};
use beacon_core::{PeerId, RoomId};
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("connection not found")]
    NotFound,
    #[error(transparent)]
    Closed(#[from] SendError),
}

struct RegistryInner {
    connections: DashMap<PeerId, Arc<Connection>>,
    next_id: AtomicU64,
    capacity: usize,
}

/// Live connections keyed by their identity.
///
/// Lookups are safe from any task. Mutations are expected to come from the
/// signaling hub only, which keeps them ordered with membership changes.
#[derive(Clone)]
pub struct ConnectionRegistry {
    inner: Arc<RegistryInner>,
}

impl ConnectionRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                connections: DashMap::new(),
                next_id: AtomicU64::new(0),
                capacity,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Stores the sink under a freshly allocated id. Ids come from a
    /// monotonic counter and are never handed out twice.
    pub fn register(
        &self,
        sink: Box<dyn PeerSink>,
        room: Option<RoomId>,
    ) -> Result<ConnectionIdentity, SignalingError> {
        if self.is_full() {
            return Err(SignalingError::RegistryFull(self.inner.capacity));
        }

        let id = PeerId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let identity = ConnectionIdentity {
            id,
            room,
            connected_at: Instant::now(),
        };

        self.inner
            .connections
            .insert(id, Arc::new(Connection::new(identity.clone(), sink)));
        debug!("Registered connection {}", id);

        Ok(identity)
    }

    pub fn resolve(&self, id: PeerId) -> Option<Arc<Connection>> {
        self.inner.connections.get(&id).map(|c| c.value().clone())
    }

    /// Removing an id that is already gone is a no-op.
    pub fn unregister(&self, id: PeerId) -> Option<ConnectionIdentity> {
        self.inner
            .connections
            .remove(&id)
            .map(|(_, conn)| conn.identity().clone())
    }

    /// Snapshot of the live identities, ordered by id.
    pub fn all(&self) -> Vec<ConnectionIdentity> {
        let mut identities: Vec<_> = self
            .inner
            .connections
            .iter()
            .map(|entry| entry.value().identity().clone())
            .collect();
        identities.sort_by_key(|i| i.id);
        identities
    }

    /// Resolves `id` and hands it one frame.
    pub fn deliver(&self, id: PeerId, frame: &str) -> Result<(), DeliveryError> {
        let Some(conn) = self.inner.connections.get(&id) else {
            return Err(DeliveryError::NotFound);
        };
        conn.send(frame)?;
        Ok(())
    }

    pub fn contains(&self, id: PeerId) -> bool {
        self.inner.connections.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.connections.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.inner.capacity
    }
}
