use crate::error::SignalError;
use crate::registry::Peer;
use camlink_core::{ClientMessage, PeerId};
use serde::Serialize;
use tokio::sync::oneshot;

/// Команды, поступающие в хаб от WebSocket-соединений.
#[derive(Debug)]
pub enum HubCommand {
    /// Новое соединение: выдать ему PeerId.
    Connect {
        reply: oneshot::Sender<Result<PeerId, SignalError>>,
    },

    /// Разобранное сообщение от клиента.
    Message {
        peer_id: PeerId,
        message: ClientMessage,
    },

    /// Кадр, который не удалось разобрать. Идёт через хаб, чтобы ошибка
    /// пришла клиенту в порядке его сообщений.
    Malformed { peer_id: PeerId, reason: String },

    /// Сигнал о разрыве WebSocket соединения.
    Disconnect { peer_id: PeerId },

    /// Снимок состояния пира (для тестов и диагностики).
    Inspect {
        peer_id: PeerId,
        reply: oneshot::Sender<Option<Peer>>,
    },

    /// Счётчики для /health.
    Stats { reply: oneshot::Sender<HubStats> },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HubStats {
    pub peers: usize,
    pub waiting: usize,
    pub rooms: usize,
    pub cameras: usize,
}
