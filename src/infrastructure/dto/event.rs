//! Event-channel frame DTOs.
//!
//! Frames pushed to subscribers: `chat.message` carries the full
//! message (including the author token — the push path is trusted) and
//! `chat.destroy` carries `{"isDestroyed": true}`.

use serde::{Deserialize, Serialize};

use crate::domain::RoomEvent;

use super::http::MessageDto;

/// Payload of a `chat.destroy` frame
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestroyPayload {
    pub is_destroyed: bool,
}

/// A frame on a room's event channel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum EventFrame {
    #[serde(rename = "chat.message")]
    Message(MessageDto),
    #[serde(rename = "chat.destroy")]
    Destroy(DestroyPayload),
}

impl From<RoomEvent> for EventFrame {
    fn from(event: RoomEvent) -> Self {
        match event {
            RoomEvent::MessagePosted(message) => Self::Message(message.into()),
            RoomEvent::RoomDestroyed => Self::Destroy(DestroyPayload { is_destroyed: true }),
        }
    }
}
