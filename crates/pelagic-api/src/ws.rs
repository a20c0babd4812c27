//! `WebSocket` handler for real-time cascade frame streaming.
//!
//! Clients connect to `GET /ws/cascade` and receive a JSON-encoded
//! [`CascadeFrame`](pelagic_cascade::CascadeFrame) on connect and after
//! every tick of a running cascade. The handler uses a
//! [`broadcast::Receiver`](tokio::sync::broadcast::Receiver) so all
//! connected dashboards see the same stream.
//!
//! If a client falls behind, lagged frames are silently skipped and the
//! client resumes from the most recent one.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming cascade frames.
///
/// # Route
///
/// `GET /ws/cascade`
pub async fn ws_cascade(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Handle the `WebSocket` lifecycle: send the current frame, then
/// subscribe to the broadcast channel and forward each frame as a text
/// frame.
async fn handle_ws(mut socket: WebSocket, state: AppState) {
    debug!("WebSocket client connected");

    let mut rx = state.subscribe();

    // New clients get the current frame immediately so a dashboard that
    // connects mid-run is not blank until the next tick.
    let initial = state.cascade.read().await.frame();
    match serde_json::to_string(&initial) {
        Ok(json) => {
            if socket.send(Message::Text(json.into())).await.is_err() {
                debug!("WebSocket client disconnected (initial send failed)");
                return;
            }
        }
        Err(e) => {
            warn!("Failed to serialize initial cascade frame: {e}");
        }
    }

    loop {
        tokio::select! {
            // Receive a frame from the cascade driver.
            result = rx.recv() => {
                match result {
                    Ok(frame) => {
                        let json = match serde_json::to_string(&frame) {
                            Ok(j) => j,
                            Err(e) => {
                                warn!("Failed to serialize cascade frame: {e}");
                                continue;
                            }
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            // Check if the client sent a close frame or disconnected.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let pong = Message::Pong(data);
                        if socket.send(pong).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {
                        // Ignore other message types (text, binary from client).
                    }
                }
            }
        }
    }
}
