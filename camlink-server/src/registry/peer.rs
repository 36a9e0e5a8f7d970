use camlink_core::{PeerId, PeerMetadata, PeerState, Role, RoomId};
use std::time::Instant;

/// Registry entry for one live connection.
#[derive(Debug, Clone)]
pub struct Peer {
    pub id: PeerId,
    pub role: Role,
    pub state: PeerState,
    /// Set iff `state == Matched`.
    pub room_id: Option<RoomId>,
    pub metadata: PeerMetadata,
    pub connected_at: Instant,
}

impl Peer {
    pub(crate) fn new(id: PeerId) -> Self {
        Self {
            id,
            role: Role::Unassigned,
            state: PeerState::Idle,
            room_id: None,
            metadata: PeerMetadata::default(),
            connected_at: Instant::now(),
        }
    }

    pub fn is_matched(&self) -> bool {
        self.room_id.is_some()
    }
}
