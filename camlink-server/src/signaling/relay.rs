use crate::directory::CameraDirectory;
use crate::error::SignalError;
use crate::registry::Registry;
use crate::room::RoomManager;
use camlink_core::{PeerId, RoomId};

/// Resolves where a signaling payload goes. Holds read-only views of the
/// hub's state for the duration of one message.
pub struct Relay<'a> {
    registry: &'a Registry,
    rooms: &'a RoomManager,
    directory: &'a CameraDirectory,
}

impl<'a> Relay<'a> {
    pub fn new(registry: &'a Registry, rooms: &'a RoomManager, directory: &'a CameraDirectory) -> Self {
        Self {
            registry,
            rooms,
            directory,
        }
    }

    /// Destination of an `offer` / `answer` / `ice-candidate` frame.
    ///
    /// With a `target_peer_id` the frame is addressed in directory mode: the
    /// target is tried as a camera id, then as the raw id of a live camera or
    /// viewer. Without one it goes to the other member of the sender's room.
    pub fn resolve(&self, from: &PeerId, target: Option<&str>) -> Result<PeerId, SignalError> {
        match target {
            Some(target) => self.resolve_target(from, target),
            None => self.resolve_partner(from),
        }
    }

    /// Partner for a room-scoped `signal`. Rejects room ids the sender is not in.
    pub fn resolve_room(&self, from: &PeerId, room_id: &RoomId) -> Result<PeerId, SignalError> {
        if !self.rooms.validate_membership(from, room_id) {
            return Err(SignalError::NotInRoom);
        }
        self.rooms
            .partner_of(room_id, from)
            .ok_or(SignalError::NotInRoom)
    }

    fn resolve_partner(&self, from: &PeerId) -> Result<PeerId, SignalError> {
        let room_id = self
            .registry
            .get(from)
            .and_then(|peer| peer.room_id)
            .ok_or(SignalError::NotInRoom)?;
        self.resolve_room(from, &room_id)
    }

    fn resolve_target(&self, from: &PeerId, target: &str) -> Result<PeerId, SignalError> {
        let by_camera_id = self.directory.lookup(target);
        let by_peer_id = || {
            target
                .parse::<PeerId>()
                .ok()
                .filter(|id| {
                    self.registry
                        .get(id)
                        .is_some_and(|peer| peer.role.is_directory())
                })
        };

        by_camera_id
            .or_else(by_peer_id)
            .filter(|dest| dest != from)
            .ok_or(SignalError::TargetNotFound)
    }
}
