use anyhow::{Context, Result};
use camlink_core::{ClientMessage, PeerId, ServerMessage};
use camlink_server::{HubHandle, Peer};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use super::mock_signaling::MockSignalingOutput;
use super::signal_helpers::{SIGNAL_TIMEOUT_MS, settle};

/// A peer driving the hub directly, without a WebSocket in between.
pub struct TestPeer {
    /// The peer ID assigned by the hub.
    pub peer_id: PeerId,
    hub: HubHandle,
    signaling: MockSignalingOutput,
    inbox: mpsc::UnboundedReceiver<ServerMessage>,
}

impl TestPeer {
    /// Connect a new peer and attach its inbox before any message can reach it.
    pub async fn connect(hub: &HubHandle, signaling: &MockSignalingOutput) -> Result<Self> {
        let peer_id = hub.connect().await.context("Hub refused connection")?;
        let inbox = signaling.attach(peer_id);

        Ok(Self {
            peer_id,
            hub: hub.clone(),
            signaling: signaling.clone(),
            inbox,
        })
    }

    pub async fn send(&self, message: ClientMessage) -> Result<()> {
        self.hub
            .send(self.peer_id, message)
            .await
            .context("Failed to send to hub")
    }

    /// Send a raw JSON frame, decoded the same way the WebSocket handler does.
    pub async fn send_json(&self, frame: Value) -> Result<()> {
        let message: ClientMessage =
            serde_json::from_value(frame).context("Frame is not a valid client message")?;
        self.send(message).await
    }

    /// Wait for the next message addressed to this peer.
    pub async fn recv(&mut self) -> Result<ServerMessage> {
        let timeout = std::time::Duration::from_millis(SIGNAL_TIMEOUT_MS);
        match tokio::time::timeout(timeout, self.inbox.recv()).await {
            Ok(Some(msg)) => Ok(msg),
            Ok(None) => anyhow::bail!("Inbox of {} closed", self.peer_id),
            Err(_) => anyhow::bail!("Timeout waiting for message to {}", self.peer_id),
        }
    }

    /// Assert nothing more is queued for this peer once the hub is idle.
    pub async fn expect_silence(&mut self) -> Result<()> {
        settle(&self.hub).await?;
        match self.inbox.try_recv() {
            Err(TryRecvError::Empty) => Ok(()),
            Err(TryRecvError::Disconnected) => Ok(()),
            Ok(msg) => anyhow::bail!("Unexpected message to {}: {:?}", self.peer_id, msg),
        }
    }

    /// Current registry entry for this peer.
    pub async fn state(&self) -> Result<Peer> {
        self.hub
            .peer(self.peer_id)
            .await?
            .with_context(|| format!("Peer {} is not registered", self.peer_id))
    }

    /// Simulate the socket closing.
    pub async fn disconnect(self) -> Result<()> {
        self.hub.disconnect(self.peer_id).await?;
        self.signaling.detach(&self.peer_id);
        settle(&self.hub).await
    }
}

impl Drop for TestPeer {
    fn drop(&mut self) {
        tracing::debug!("[TestPeer] Dropping peer {}", self.peer_id);
    }
}
