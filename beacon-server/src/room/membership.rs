use beacon_core::{PeerId, RoomId};
use std::collections::{BTreeSet, HashMap};

/// Result of [`MembershipIndex::join`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The peer entered the room. `occupants` are the others already there.
    Joined { occupants: Vec<PeerId> },
    /// The peer is already in a room; nothing changed.
    AlreadyJoined { room: Option<RoomId> },
}

/// Result of [`MembershipIndex::leave`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room: Option<RoomId>,
    pub remaining: Vec<PeerId>,
}

/// Which room each connection is in, and who is in each room.
///
/// A peer is in at most one room. The global room (`None`) is kept around once
/// created; named rooms are dropped as soon as they empty out.
#[derive(Debug, Default)]
pub struct MembershipIndex {
    rooms: HashMap<Option<RoomId>, BTreeSet<PeerId>>,
    locations: HashMap<PeerId, Option<RoomId>>,
}

impl MembershipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&mut self, id: PeerId, room: Option<RoomId>) -> JoinOutcome {
        if let Some(current) = self.locations.get(&id) {
            return JoinOutcome::AlreadyJoined {
                room: current.clone(),
            };
        }

        let members = self.rooms.entry(room.clone()).or_default();
        let occupants = members.iter().copied().collect();
        members.insert(id);
        self.locations.insert(id, room);

        JoinOutcome::Joined { occupants }
    }

    /// Leaving when not in a room returns `None`.
    pub fn leave(&mut self, id: PeerId) -> Option<Departure> {
        let room = self.locations.remove(&id)?;

        let remaining = match self.rooms.get_mut(&room) {
            Some(members) => {
                members.remove(&id);
                members.iter().copied().collect()
            }
            None => Vec::new(),
        };

        if room.is_some() && remaining.is_empty() {
            self.rooms.remove(&room);
        }

        Some(Departure { room, remaining })
    }

    /// Occupants in id order. Unknown rooms are simply empty.
    pub fn occupants_of(&self, room: Option<&RoomId>) -> Vec<PeerId> {
        self.rooms
            .get(&room.cloned())
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
