//! Core domain models for the ephemeral chat rooms.

use serde::{Deserialize, Serialize};

use super::value_object::{MessageText, RoomId, SenderName, SessionToken, Timestamp};

/// Maximum number of participants allowed in a room
pub const PARTICIPANT_CAPACITY: usize = 2;

/// Fixed room lifetime in seconds
pub const ROOM_TTL_SECONDS: u64 = 600;

/// Fixed room lifetime as a Duration
pub const ROOM_TTL: std::time::Duration = std::time::Duration::from_secs(ROOM_TTL_SECONDS);

/// Room metadata as seen through the store.
///
/// The remaining lifetime is not a field here: it is derived from the
/// store's expiration on the metadata key. A room whose expiration has
/// elapsed is non-existent regardless of whether its keys have been
/// physically purged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMeta {
    /// Room identifier
    pub id: RoomId,
    /// Connected session tokens, insertion order = join order (0-2 entries)
    pub connected: Vec<SessionToken>,
    /// Timestamp when the room was created
    pub created_at: Timestamp,
}

impl RoomMeta {
    /// Create room metadata with an empty membership list.
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            connected: Vec::new(),
            created_at,
        }
    }

    /// Whether the room has reached participant capacity.
    pub fn is_full(&self) -> bool {
        self.connected.len() >= PARTICIPANT_CAPACITY
    }

    /// Whether the given token occupies a membership slot.
    pub fn contains(&self, token: &str) -> bool {
        self.connected.iter().any(|t| t.as_str() == token)
    }
}

/// Decode a stored membership value into an ordered token sequence.
///
/// The stored representation is ambiguous: a JSON array of tokens, a
/// JSON string, or a bare legacy token written before membership was
/// JSON-encoded. Anything unparseable yields an empty sequence so a
/// decode hiccup never makes an otherwise-valid room inaccessible.
pub fn decode_connected(raw: &str) -> Vec<SessionToken> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .filter_map(|s| SessionToken::new(s.to_string()).ok())
            .collect(),
        Ok(serde_json::Value::String(s)) => {
            SessionToken::new(s).ok().into_iter().collect()
        }
        // Legacy single non-JSON value: the raw string is the token
        _ => SessionToken::new(raw.to_string()).ok().into_iter().collect(),
    }
}

/// Encode a membership list for persistence (always a JSON array).
pub fn encode_connected(tokens: &[SessionToken]) -> String {
    serde_json::to_string(tokens).unwrap_or_else(|_| "[]".to_string())
}

/// A chat message, immutable once appended to a room's log.
///
/// `token` is the author's session token. It is carried in full on the
/// trusted publish path and cleared on the read path for everyone but
/// the author (see [`ChatMessage::redacted_for`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message identifier, unique within the room
    pub id: String,
    /// Room the message belongs to
    pub room_id: RoomId,
    /// Sender display name
    pub sender: SenderName,
    /// Message body
    pub text: MessageText,
    /// Timestamp when the message was created
    pub timestamp: Timestamp,
    /// Author's session token; `None` once redacted
    pub token: Option<SessionToken>,
}

impl ChatMessage {
    /// Create a new chat message.
    pub fn new(
        id: String,
        room_id: RoomId,
        sender: SenderName,
        text: MessageText,
        timestamp: Timestamp,
        token: SessionToken,
    ) -> Self {
        Self {
            id,
            room_id,
            sender,
            text,
            timestamp,
            token: Some(token),
        }
    }

    /// Copy of the message with the token cleared unless it matches
    /// the requester's own, letting a client recognize its own
    /// messages without leaking the other participant's token.
    pub fn redacted_for(&self, own_token: &SessionToken) -> Self {
        let mut msg = self.clone();
        if msg.token.as_ref() != Some(own_token) {
            msg.token = None;
        }
        msg
    }
}
