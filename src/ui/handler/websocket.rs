//! WebSocket subscription handler for the per-room event channel.
//!
//! The channel is push-only: clients post over HTTP and receive
//! `chat.message` / `chat.destroy` frames here. Delivery is best
//! effort; a lagging or reconnecting client reconciles via the
//! message-log and TTL endpoints.

use std::sync::Arc;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::broadcast;

use crate::{
    domain::RoomEvent, infrastructure::dto::event::EventFrame, ui::state::AppState,
    usecase::Session,
};

use super::http::authenticate;

/// Upgrade to a WebSocket subscribed to the room's event channel.
pub async fn subscribe_events(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    let session = authenticate(&state, &room_id, &headers).await?;
    let rx = state.publisher.subscribe(&session.room_id).await;

    tracing::info!(room_id = %session.room_id, "event subscriber connected");
    Ok(ws.on_upgrade(move |socket| forward_events(socket, session, rx)))
}

async fn forward_events(
    socket: WebSocket,
    session: Session,
    mut rx: broadcast::Receiver<RoomEvent>,
) {
    let (mut sender, mut receiver) = socket.split();
    let room_id = session.room_id.clone();

    // Forward events from the room's channel to this client
    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let destroyed = event == RoomEvent::RoomDestroyed;
                    let frame = EventFrame::from(event);
                    let json = match serde_json::to_string(&frame) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!(room_id = %room_id, error = %e, "failed to encode event frame");
                            continue;
                        }
                    };
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                    if destroyed {
                        // Final frame for this room; close the stream
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        room_id = %room_id,
                        skipped,
                        "subscriber lagged; missed events must be reconciled via reads"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Drain incoming frames so we notice the client going away
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    };

    tracing::info!(room_id = %session.room_id, "event subscriber disconnected");
}
