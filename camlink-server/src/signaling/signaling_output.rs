use async_trait::async_trait;
use camlink_core::{PeerId, ServerMessage};

/// Трейт, который должна реализовать внешняя система (WebSocket сервер),
/// чтобы хаб мог отправлять сообщения клиентам.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Отправить сообщение конкретному пиру. Отключённые пиры молча пропускаются.
    async fn send(&self, peer_id: PeerId, msg: ServerMessage);
}
