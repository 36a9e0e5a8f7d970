use anyhow::{Context, Result};
use camlink_core::{CallRole, RoomId, ServerMessage};
use camlink_server::HubHandle;

use super::test_client::TestPeer;

/// Timeout for a single expected message (ms).
pub const SIGNAL_TIMEOUT_MS: u64 = 2000;

/// Round-trip through the hub. Every command sent before this call has been
/// fully processed when it returns.
pub async fn settle(hub: &HubHandle) -> Result<()> {
    hub.stats().await.context("Hub is gone")?;
    Ok(())
}

/// Expect a `match` message and return its room and role.
pub async fn expect_match(peer: &mut TestPeer) -> Result<(RoomId, CallRole)> {
    match peer.recv().await? {
        ServerMessage::Match { room_id, role } => Ok((room_id, role)),
        other => anyhow::bail!("Expected match for {}, got {:?}", peer.peer_id, other),
    }
}

pub async fn expect_waiting(peer: &mut TestPeer) -> Result<()> {
    match peer.recv().await? {
        ServerMessage::Waiting => Ok(()),
        other => anyhow::bail!("Expected waiting for {}, got {:?}", peer.peer_id, other),
    }
}

pub async fn expect_error(peer: &mut TestPeer) -> Result<String> {
    match peer.recv().await? {
        ServerMessage::Error { message } => Ok(message),
        other => anyhow::bail!("Expected error for {}, got {:?}", peer.peer_id, other),
    }
}

/// Put two fresh peers through `next`. `first` ends up caller; returns the shared room.
pub async fn pair_up(first: &mut TestPeer, second: &mut TestPeer) -> Result<RoomId> {
    first.send_json(serde_json::json!({"type": "next"})).await?;
    expect_waiting(first).await?;

    second.send_json(serde_json::json!({"type": "next"})).await?;

    let (room_a, role_a) = expect_match(first).await?;
    let (room_b, role_b) = expect_match(second).await?;

    anyhow::ensure!(room_a == room_b, "Peers matched into different rooms");
    anyhow::ensure!(role_a == CallRole::Caller, "First queued must be caller");
    anyhow::ensure!(role_b == CallRole::Callee, "Second queued must be callee");
    Ok(room_a)
}
