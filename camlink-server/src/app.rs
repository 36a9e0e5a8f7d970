use crate::config::ServerConfig;
use crate::hub::{Hub, HubHandle, HubStats};
use crate::signaling::{SignalingService, ws_handler};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    pub signaling: SignalingService,
    pub hub: HubHandle,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Spawns the hub and wires it to a fresh signaling service.
    pub fn new(config: ServerConfig) -> Self {
        let signaling = SignalingService::new();
        let hub = Hub::spawn(
            config.hub_settings(),
            Arc::new(signaling.clone()),
            config.command_buffer,
        );

        Self {
            signaling,
            hub,
            config: Arc::new(config),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    #[serde(flatten)]
    stats: HubStats,
}

async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    match state.hub.stats().await {
        Ok(stats) => Ok(Json(HealthResponse {
            status: "ok",
            service: "camlink",
            stats,
        })),
        Err(e) => {
            error!("Health check failed: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/signaling", get(ws_handler))
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
