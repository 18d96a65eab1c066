// GET handlers: version, current view, raw snapshot

use axum::{extract::State, response::IntoResponse};

use super::AppState;
use crate::version::{NAME, VERSION};
use crate::view;

/// GET /version — crate name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/view — the dashboard view for the latest snapshot.
pub(super) async fn view_handler(State(state): State<AppState>) -> impl IntoResponse {
    let view = view::render(&state.snapshot_rx.borrow());
    axum::Json(view)
}

/// GET /api/snapshot — the latest snapshot as held by the poller.
pub(super) async fn snapshot_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.snapshot_rx.borrow().clone();
    axum::Json(snapshot)
}
