//! WebSocket stream of violation events for one session.
//!
//! `GET /api/v1/sessions/{id}/events` upgrades to a WebSocket. Once
//! connected, the handler:
//!
//! - **Forwards events:** subscribes to the [`ViolationBus`] and pushes every
//!   event of this session to the client as a JSON text frame, for toast
//!   display.
//! - **Receives commands:** parses incoming text frames as [`WsCommand`]
//!   (`ping`, `snapshot`).
//!
//! Lagged receivers skip the missed events and keep going. Closing the
//! socket leaves the session open.
//!
//! [`ViolationBus`]: autocomment_core::event::ViolationBus

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use uuid::Uuid;

use autocomment_types::event::ViolationEvent;

use super::session_entry;
use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::state::{AppState, SessionEntry};

/// Incoming command from a WebSocket client.
#[derive(Debug, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    /// Keep-alive. Answered with `{"type":"pong"}`.
    Ping,
    /// Ask for the current surface snapshot.
    Snapshot,
}

/// Upgrade to a WebSocket streaming this session's violation events.
pub async fn session_events(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let entry = session_entry(&state, &id, &auth)?;
    let session_id = super::parse_uuid(&id)?;
    let events = state.bus.subscribe();
    Ok(ws
        .on_upgrade(move |socket| handle_connection(socket, session_id, entry, events))
        .into_response())
}

/// Whether `event` belongs on the stream of `session_id`.
fn belongs_to(event: &ViolationEvent, session_id: Uuid) -> bool {
    event.session_id == session_id
}

async fn handle_connection(
    socket: WebSocket,
    session_id: Uuid,
    entry: SessionEntry,
    mut events: broadcast::Receiver<ViolationEvent>,
) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    tracing::debug!(%session_id, "event stream connected");

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(event) if belongs_to(&event, session_id) => {
                        match serde_json::to_string(&event) {
                            Ok(json) => {
                                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                                    break;
                                }
                            }
                            Err(err) => tracing::warn!("Failed to serialize ViolationEvent: {err}"),
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(%session_id, skipped = n, "event stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            message = ws_receiver.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => {
                        process_command(&text, &mut ws_sender, &entry).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!("WebSocket receive error: {err}");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::debug!(%session_id, "event stream closed");
}

async fn process_command(
    text: &str,
    ws_sender: &mut (impl SinkExt<Message, Error = axum::Error> + Unpin),
    entry: &SessionEntry,
) {
    let cmd: WsCommand = match serde_json::from_str(text) {
        Ok(cmd) => cmd,
        Err(err) => {
            tracing::warn!(raw = %text, error = %err, "Ignoring malformed WebSocket command");
            return;
        }
    };

    let reply = match cmd {
        WsCommand::Ping => Ok(r#"{"type":"pong"}"#.to_string()),
        WsCommand::Snapshot => {
            let snapshot = entry.surface.lock().await.snapshot();
            serde_json::to_string(&serde_json::json!({
                "type": "snapshot",
                "snapshot": snapshot,
            }))
        }
    };

    match reply {
        Ok(reply) => {
            if ws_sender.send(Message::Text(reply.into())).await.is_err() {
                tracing::debug!("Failed to send reply (client disconnecting)");
            }
        }
        Err(err) => tracing::warn!("Failed to serialize reply: {err}"),
    }
}
