//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{
    create_room, destroy_room, get_room_ttl, health_check, join_room, list_messages, post_message,
};

// Re-export WebSocket handler
pub use websocket::subscribe_events;
