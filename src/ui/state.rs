//! Server state shared across handlers.

use std::sync::Arc;

use crate::common::time::Clock;
use crate::domain::RoomStore;
use crate::infrastructure::publisher::BroadcastEventPublisher;

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub store: Arc<dyn RoomStore>,
    /// Per-room event channels; the WebSocket handler subscribes here
    pub publisher: Arc<BroadcastEventPublisher>,
    /// Wall clock injected for testability
    pub clock: Arc<dyn Clock>,
}
