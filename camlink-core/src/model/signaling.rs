use crate::model::peer::PeerId;
use crate::model::room::{CallRole, RoomId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Roles a client may declare with `register`. Roulette seekers never register,
/// they just send `next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterRole {
    Camera,
    Viewer,
}

/// Body of an `offer`, `answer` or `ice-candidate` frame.
///
/// Everything besides the routing field is kept as-is in `body` so the relay
/// can pass SDP and ICE content through without knowing its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_peer_id: Option<String>,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

/// A relay payload as delivered to its destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayedPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_peer_id: Option<String>,
    pub from_peer_id: PeerId,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl RelayPayload {
    /// Stamps the real sender. A client-supplied `from_peer_id` is dropped.
    pub fn tagged(mut self, from_peer_id: PeerId) -> RelayedPayload {
        self.body.remove("from_peer_id");
        RelayedPayload {
            target_peer_id: self.target_peer_id,
            from_peer_id,
            body: self.body,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayKind {
    Offer,
    Answer,
    IceCandidate,
}

impl RelayKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RelayKind::Offer => "offer",
            RelayKind::Answer => "answer",
            RelayKind::IceCandidate => "ice-candidate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraEntry {
    pub peer_id: PeerId,
    pub camera_id: String,
}

/// Frames sent by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    Register {
        role: RegisterRole,
        #[serde(default)]
        camera_id: Option<String>,
        #[serde(default)]
        user_id: Option<String>,
    },
    Next,
    Leave,
    Offer(RelayPayload),
    Answer(RelayPayload),
    IceCandidate(RelayPayload),
    ListCameras,
    Signal {
        #[serde(rename = "roomId")]
        room_id: RoomId,
        data: Value,
    },
    Ping,
}

impl ClientMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::Register { .. } => "register",
            ClientMessage::Next => "next",
            ClientMessage::Leave => "leave",
            ClientMessage::Offer(_) => RelayKind::Offer.as_str(),
            ClientMessage::Answer(_) => RelayKind::Answer.as_str(),
            ClientMessage::IceCandidate(_) => RelayKind::IceCandidate.as_str(),
            ClientMessage::ListCameras => "list-cameras",
            ClientMessage::Signal { .. } => "signal",
            ClientMessage::Ping => "ping",
        }
    }
}

/// Frames sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    Hello {
        #[serde(rename = "peerId")]
        peer_id: PeerId,
    },
    Registered {
        peer_id: PeerId,
    },
    Waiting,
    Match {
        #[serde(rename = "roomId")]
        room_id: RoomId,
        role: CallRole,
    },
    Signal {
        #[serde(rename = "roomId")]
        room_id: RoomId,
        data: Value,
        from_peer_id: PeerId,
    },
    Offer(RelayedPayload),
    Answer(RelayedPayload),
    IceCandidate(RelayedPayload),
    CameraList {
        cameras: Vec<CameraEntry>,
    },
    #[serde(rename = "partner_left")]
    PartnerLeft,
    Error {
        message: String,
    },
    Pong,
}

impl ServerMessage {
    pub fn relayed(kind: RelayKind, payload: RelayedPayload) -> Self {
        match kind {
            RelayKind::Offer => ServerMessage::Offer(payload),
            RelayKind::Answer => ServerMessage::Answer(payload),
            RelayKind::IceCandidate => ServerMessage::IceCandidate(payload),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }
}
