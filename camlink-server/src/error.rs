use camlink_core::{PeerId, RoomId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    /// Invalid JSON, unknown `type`, or a missing required field.
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    #[error("Target peer not found")]
    TargetNotFound,

    #[error("Not in a room")]
    NotInRoom,

    /// Room bookkeeping went out of sync. Never expected in normal operation.
    #[error("Peer {peer_id} is already matched in room {room_id}")]
    AlreadyMatched { peer_id: PeerId, room_id: RoomId },

    #[error("Peer {0} is not registered")]
    UnknownPeer(PeerId),

    #[error("Server is full")]
    RegistryFull,

    #[error("Signaling hub is unavailable")]
    HubUnavailable,
}

impl SignalError {
    /// Faults that indicate broken invariants rather than a bad request.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            SignalError::AlreadyMatched { .. } | SignalError::UnknownPeer(_)
        )
    }
}
