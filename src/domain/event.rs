//! Per-room event channel abstraction.
//!
//! The core never talks to a transport directly: mutations that matter
//! to the other participant are announced through an injected
//! [`EventPublisher`] capability, and external clients subscribe to
//! the room's channel on their own. Delivery is best effort,
//! at-most-once; a disconnected subscriber reconciles via the read
//! operations on reconnect.

use async_trait::async_trait;

use super::entity::ChatMessage;
use super::value_object::RoomId;

/// Discrete events published on a room's channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    /// A message was appended to the room's log. Carries the full
    /// message including the author token (the publish path is
    /// trusted; only the pull path redacts).
    MessagePosted(ChatMessage),
    /// The room is being destroyed. Published before any key is
    /// deleted so subscribers can still fetch a final state.
    RoomDestroyed,
}

/// Fan-out capability injected into the use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event on the room's channel. Best effort: a publish
    /// with no subscribers is not an error.
    async fn publish(&self, room_id: &RoomId, event: RoomEvent);
}
