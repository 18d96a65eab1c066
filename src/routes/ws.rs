// WebSocket view stream: current view on connect, then one message per snapshot change

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use tokio::sync::watch;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::acquisition::DashboardSnapshot;
use crate::view;

pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub(super) async fn ws_view(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let rx = state.snapshot_rx.clone();
    let ping_every = Duration::from_secs(state.config.publishing.ws_ping_interval_secs);
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = stream_view(socket, rx, ping_every).await {
            tracing::info!("View stream error: {}", e);
        }
    })
}

/// Sends `text`; false when the client is gone or too slow.
async fn send_text(socket: &mut WebSocket, text: String) -> bool {
    let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(text.into()))).await;
    matches!(r, Ok(Ok(())))
}

async fn stream_view(
    mut socket: WebSocket,
    mut rx: watch::Receiver<DashboardSnapshot>,
    ping_every: Duration,
) -> anyhow::Result<()> {
    tracing::info!("Client connected to view stream");

    let current = view::render(&rx.borrow_and_update());
    if !send_text(&mut socket, serde_json::to_string(&current)?).await {
        return Ok(());
    }

    let mut ping_interval =
        tokio::time::interval_at(tokio::time::Instant::now() + ping_every, ping_every);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    // Poller stopped; nothing more will arrive.
                    break;
                }
                let next = view::render(&rx.borrow_and_update());
                if !send_text(&mut socket, serde_json::to_string(&next)?).await {
                    break;
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if !matches!(r, Ok(Ok(()))) {
                    break;
                }
            }
        }
    }
    Ok(())
}
