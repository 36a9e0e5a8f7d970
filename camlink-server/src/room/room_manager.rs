use crate::error::SignalError;
use crate::registry::Registry;
use crate::room::Room;
use camlink_core::{PeerId, RoomId, RoomState};
use std::collections::HashMap;
use tracing::info;

/// Result of tearing a room down.
#[derive(Debug)]
pub struct ClosedRoom {
    pub room: Room,
    /// Members still registered, excluding the one that caused the close.
    pub survivors: Vec<PeerId>,
}

/// Arena of active rooms.
#[derive(Default)]
pub struct RoomManager {
    rooms: HashMap<RoomId, Room>,
}

impl RoomManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a room and points both peers at it.
    ///
    /// Both peers must be registered and outside any room; the registry is
    /// left untouched on error.
    pub fn open(
        &mut self,
        registry: &mut Registry,
        caller: PeerId,
        callee: PeerId,
    ) -> Result<RoomId, SignalError> {
        for peer_id in [caller, callee] {
            let peer = registry
                .get(&peer_id)
                .ok_or(SignalError::UnknownPeer(peer_id))?;
            if let Some(room_id) = peer.room_id {
                return Err(SignalError::AlreadyMatched { peer_id, room_id });
            }
        }

        let room = Room::new(caller, callee);
        let room_id = room.id;

        registry.set_matched(&caller, room_id);
        registry.set_matched(&callee, room_id);
        self.rooms.insert(room_id, room);

        info!("Room {} opened: caller {} / callee {}", room_id, caller, callee);
        Ok(room_id)
    }

    /// Closes the room and clears `room_id` on every member still registered.
    ///
    /// Returns `None` if the room is already gone.
    pub fn close(
        &mut self,
        registry: &mut Registry,
        room_id: &RoomId,
        departing: Option<PeerId>,
    ) -> Option<ClosedRoom> {
        let mut room = self.rooms.remove(room_id)?;
        room.state = RoomState::Closed;

        let mut survivors = Vec::new();
        for member in room.members() {
            if !registry.contains(&member) {
                continue;
            }
            registry.set_idle(&member);
            if Some(member) != departing {
                survivors.push(member);
            }
        }

        info!("Room {} closed after {:?}", room_id, room.opened_at.elapsed());
        Some(ClosedRoom { room, survivors })
    }

    pub fn validate_membership(&self, peer_id: &PeerId, room_id: &RoomId) -> bool {
        self.rooms
            .get(room_id)
            .is_some_and(|room| room.contains(peer_id))
    }

    pub fn partner_of(&self, room_id: &RoomId, peer_id: &PeerId) -> Option<PeerId> {
        self.rooms.get(room_id)?.other(peer_id)
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
