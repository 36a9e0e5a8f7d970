mod peer;
mod room;
mod signaling;

pub use peer::{PeerId, PeerMetadata, PeerState, Role};
pub use room::{CallRole, RoomId, RoomState};
pub use signaling::{
    CameraEntry, ClientMessage, RegisterRole, RelayKind, RelayPayload, RelayedPayload,
    ServerMessage,
};
