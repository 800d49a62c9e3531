//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::ChatMessage;

/// Response for room creation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomResponse {
    pub room_id: String,
}

/// Response for admission (the token itself travels in the cookie)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomResponse {
    pub room_id: String,
}

/// Response for the remaining-TTL endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtlResponse {
    pub ttl: u64,
}

/// Request body for posting a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMessageRequest {
    pub sender: String,
    pub text: String,
}

/// A chat message on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: String,
    pub room_id: String,
    pub sender: String,
    pub text: String,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Author token; present only on the trusted push path or for the
    /// requester's own messages on the read path
    pub token: Option<String>,
}

impl From<ChatMessage> for MessageDto {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id,
            room_id: message.room_id.into_string(),
            sender: message.sender.into_string(),
            text: message.text.into_string(),
            timestamp: message.timestamp.value(),
            token: message.token.map(|t| t.into_string()),
        }
    }
}

/// Response wrapping a single posted message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMessageResponse {
    pub message: MessageDto,
}

/// Response for the message-log endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMessagesResponse {
    pub messages: Vec<MessageDto>,
}
