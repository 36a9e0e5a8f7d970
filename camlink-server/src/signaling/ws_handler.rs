use crate::app::AppState;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use camlink_core::{ClientMessage, ServerMessage};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    let peer_id = match state.hub.connect().await {
        Ok(peer_id) => peer_id,
        Err(e) => {
            warn!("Refusing WebSocket connection: {}", e);
            if let Ok(json) = serde_json::to_string(&ServerMessage::error(e.to_string())) {
                let _ = sender.send(Message::Text(json.into())).await;
            }
            let _ = sender.send(Message::Close(None)).await;
            return;
        }
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    state.signaling.add_peer(peer_id, tx);
    info!(
        "New WebSocket connection: {} ({} open)",
        peer_id,
        state.signaling.connection_count()
    );
    state
        .signaling
        .send_signal(peer_id, &ServerMessage::Hello { peer_id });

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let state = state.clone();
        let idle_timeout = state.config.heartbeat_timeout();

        async move {
            loop {
                let next = match idle_timeout {
                    Some(limit) => match tokio::time::timeout(limit, receiver.next()).await {
                        Ok(next) => next,
                        Err(_) => {
                            warn!("Peer {} silent for {:?}, closing", peer_id, limit);
                            break;
                        }
                    },
                    None => receiver.next().await,
                };

                let Some(Ok(msg)) = next else {
                    break;
                };

                match msg {
                    Message::Text(text) => {
                        match serde_json::from_str::<ClientMessage>(text.as_str()) {
                            Ok(message) => {
                                if let Err(e) = state.hub.send(peer_id, message).await {
                                    error!("Hub died: {}", e);
                                    break;
                                }
                            }
                            Err(e) => {
                                debug!("Undecodable frame from {}: {}", peer_id, e);
                                if let Err(e) = state.hub.reject(peer_id, e.to_string()).await {
                                    error!("Hub died: {}", e);
                                    break;
                                }
                            }
                        }
                    }
                    Message::Binary(_) => warn!("Ignoring binary frame from {}", peer_id),
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    // Whichever side ended the socket, the hub hears about it exactly once.
    if let Err(e) = state.hub.disconnect(peer_id).await {
        error!("Failed to report disconnect of {}: {}", peer_id, e);
    }
    state.signaling.remove_peer(&peer_id);
    info!("WebSocket disconnected: {}", peer_id);
}
