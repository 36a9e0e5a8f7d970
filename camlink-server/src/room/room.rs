use camlink_core::{PeerId, RoomId, RoomState};
use std::time::Instant;

/// A two-party signaling session. Members are stored by id; the peers point
/// back through `Peer::room_id`.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    caller: PeerId,
    callee: PeerId,
    pub state: RoomState,
    pub opened_at: Instant,
}

impl Room {
    pub(crate) fn new(caller: PeerId, callee: PeerId) -> Self {
        Self {
            id: RoomId::new(),
            caller,
            callee,
            state: RoomState::Active,
            opened_at: Instant::now(),
        }
    }

    /// Caller first.
    pub fn members(&self) -> [PeerId; 2] {
        [self.caller, self.callee]
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.caller == *peer_id || self.callee == *peer_id
    }

    /// The member that is not `peer_id`, if `peer_id` is a member.
    pub fn other(&self, peer_id: &PeerId) -> Option<PeerId> {
        if self.caller == *peer_id {
            Some(self.callee)
        } else if self.callee == *peer_id {
            Some(self.caller)
        } else {
            None
        }
    }
}
