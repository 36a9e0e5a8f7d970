use crate::error::SignalError;
use crate::hub::{HubCommand, HubStats};
use crate::registry::Peer;
use camlink_core::{ClientMessage, PeerId};
use tokio::sync::{mpsc, oneshot};

/// Cloneable entry point into the hub task.
#[derive(Clone)]
pub struct HubHandle {
    tx: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    pub fn new(tx: mpsc::Sender<HubCommand>) -> Self {
        Self { tx }
    }

    pub async fn connect(&self) -> Result<PeerId, SignalError> {
        let (reply, rx) = oneshot::channel();
        self.command(HubCommand::Connect { reply }).await?;
        rx.await.map_err(|_| SignalError::HubUnavailable)?
    }

    pub async fn send(&self, peer_id: PeerId, message: ClientMessage) -> Result<(), SignalError> {
        self.command(HubCommand::Message { peer_id, message }).await
    }

    /// Reports a frame that failed to decode; the hub answers with an `error`.
    pub async fn reject(&self, peer_id: PeerId, reason: String) -> Result<(), SignalError> {
        self.command(HubCommand::Malformed { peer_id, reason }).await
    }

    pub async fn disconnect(&self, peer_id: PeerId) -> Result<(), SignalError> {
        self.command(HubCommand::Disconnect { peer_id }).await
    }

    pub async fn peer(&self, peer_id: PeerId) -> Result<Option<Peer>, SignalError> {
        let (reply, rx) = oneshot::channel();
        self.command(HubCommand::Inspect { peer_id, reply }).await?;
        rx.await.map_err(|_| SignalError::HubUnavailable)
    }

    pub async fn stats(&self) -> Result<HubStats, SignalError> {
        let (reply, rx) = oneshot::channel();
        self.command(HubCommand::Stats { reply }).await?;
        rx.await.map_err(|_| SignalError::HubUnavailable)
    }

    async fn command(&self, cmd: HubCommand) -> Result<(), SignalError> {
        self.tx
            .send(cmd)
            .await
            .map_err(|_| SignalError::HubUnavailable)
    }
}
