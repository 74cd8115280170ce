//! Bidirectional `WebSocket` handler.
//!
//! Clients connect to `GET /ws`. On connect they receive a full
//! `game_state` message, then the live stream of outbound messages
//! (game updates, combat events, synchronizer deltas). Frames sent by
//! the client are parsed as commands and executed; malformed frames are
//! dropped with a warning. A client that falls behind the broadcast
//! channel skips ahead to the newest message.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::{debug, warn};

use skirmish_types::snapshot::OutboundMessage;

use crate::commands;
use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Drive one `WebSocket` connection until it closes.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    // Initial full state so the client can render immediately.
    let initial = OutboundMessage::GameState(state.full_state().await);
    if send_message(&mut socket, &initial).await.is_err() {
        debug!("WebSocket client disconnected during handshake");
        return;
    }

    let mut rx = state.subscribe();

    loop {
        tokio::select! {
            // Outbound: forward broadcast messages to the client.
            result = rx.recv() => {
                match result {
                    Ok(message) => {
                        if send_message(&mut socket, &message).await.is_err() {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "WebSocket client lagged, skipping ahead");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            // Inbound: commands, pings, and close frames.
            frame = socket.recv() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        commands::handle_text(&state, &text).await;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Err(error)) => {
                        debug!(%error, "WebSocket error");
                        return;
                    }
                    _ => {
                        // Binary and pong frames are ignored.
                    }
                }
            }
        }
    }
}

/// Serialize and send one message as a text frame.
async fn send_message(
    socket: &mut WebSocket,
    message: &OutboundMessage,
) -> Result<(), axum::Error> {
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(error) => {
            warn!(%error, "Failed to serialize outbound message");
            return Ok(());
        }
    };
    socket.send(Message::Text(json.into())).await
}
