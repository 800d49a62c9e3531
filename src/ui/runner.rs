//! Router assembly and server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::common::time::Clock;
use crate::domain::RoomStore;
use crate::infrastructure::publisher::BroadcastEventPublisher;

use super::handler::{
    create_room, destroy_room, get_room_ttl, health_check, join_room, list_messages, post_message,
    subscribe_events,
};
use super::signal::shutdown_signal;
use super::state::AppState;

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/rooms", post(create_room))
        .route("/api/rooms/{room_id}", delete(destroy_room))
        .route("/api/rooms/{room_id}/join", post(join_room))
        .route("/api/rooms/{room_id}/ttl", get(get_room_ttl))
        .route(
            "/api/rooms/{room_id}/messages",
            post(post_message).get(list_messages),
        )
        .route("/api/rooms/{room_id}/events", get(subscribe_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until a shutdown signal arrives.
pub async fn run(
    store: Arc<dyn RoomStore>,
    clock: Arc<dyn Clock>,
    addr: SocketAddr,
) -> std::io::Result<()> {
    let state = Arc::new(AppState {
        store,
        publisher: Arc::new(BroadcastEventPublisher::new()),
        clock,
    });
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
