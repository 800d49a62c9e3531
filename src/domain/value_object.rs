//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the
//! domain. They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Room identifier value object.
///
/// An opaque, globally unique identifier generated at room creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    /// Create a new RoomId from an externally supplied string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty or not a UUID.
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::RoomIdEmpty);
        }
        if uuid::Uuid::parse_str(&id).is_err() {
            return Err(ValueObjectError::RoomIdInvalidFormat(id));
        }
        Ok(Self(id))
    }

    /// Create a RoomId directly from a UUID (always valid).
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session token value object.
///
/// An opaque, unguessable credential binding a client to one
/// membership slot in one room. Never reused across rooms and not
/// renewable: losing it forfeits the slot until room expiry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(String);

impl SessionToken {
    /// Create a new SessionToken.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or over 128 characters.
    pub fn new(token: String) -> Result<Self, ValueObjectError> {
        if token.is_empty() {
            return Err(ValueObjectError::SessionTokenEmpty);
        }
        let len = token.len();
        if len > 128 {
            return Err(ValueObjectError::SessionTokenTooLong { max: 128, actual: len });
        }
        Ok(Self(token))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tokens are credentials; display only a prefix
        let prefix: String = self.0.chars().take(8).collect();
        write!(f, "{prefix}…")
    }
}

/// Sender display name value object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderName(String);

impl SenderName {
    /// Create a new SenderName.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or over 100 characters.
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.is_empty() {
            return Err(ValueObjectError::SenderNameEmpty);
        }
        let len = name.len();
        if len > 100 {
            return Err(ValueObjectError::SenderNameTooLong { max: 100, actual: len });
        }
        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SenderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message text value object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageText(String);

impl MessageText {
    /// Create a new MessageText.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is empty or over 1000 characters.
    pub fn new(text: String) -> Result<Self, ValueObjectError> {
        if text.is_empty() {
            return Err(ValueObjectError::MessageTextEmpty);
        }
        let len = text.len();
        if len > 1000 {
            return Err(ValueObjectError::MessageTextTooLong { max: 1000, actual: len });
        }
        Ok(Self(text))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp from Unix milliseconds.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
