// HTTP + WebSocket routes serving the dashboard view to an external renderer

mod http;
mod ws;

use axum::{Router, routing::get};
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};

use crate::acquisition::DashboardSnapshot;
use crate::config::AppConfig;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) snapshot_rx: watch::Receiver<DashboardSnapshot>,
    pub(crate) config: AppConfig,
}

pub fn app(snapshot_rx: watch::Receiver<DashboardSnapshot>, config: AppConfig) -> Router {
    let state = AppState {
        snapshot_rx,
        config,
    };
    Router::new()
        .route("/", get(|| async { "airguard: air-quality telemetry client" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/view", get(http::view_handler)) // GET /api/view
        .route("/api/snapshot", get(http::snapshot_handler)) // GET /api/snapshot
        .route("/ws/view", get(ws::ws_view)) // WS /ws/view
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
