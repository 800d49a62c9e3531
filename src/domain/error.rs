//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// RoomId validation error
    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    /// RoomId invalid format error (not a valid UUID format)
    #[error("RoomId must be a valid UUID format (got: {0})")]
    RoomIdInvalidFormat(String),

    /// SessionToken validation error
    #[error("SessionToken cannot be empty")]
    SessionTokenEmpty,

    /// SessionToken too long error
    #[error("SessionToken cannot exceed {max} characters (got {actual})")]
    SessionTokenTooLong { max: usize, actual: usize },

    /// SenderName validation error
    #[error("SenderName cannot be empty")]
    SenderNameEmpty,

    /// SenderName too long error
    #[error("SenderName cannot exceed {max} characters (got {actual})")]
    SenderNameTooLong { max: usize, actual: usize },

    /// MessageText validation error
    #[error("MessageText cannot be empty")]
    MessageTextEmpty,

    /// MessageText too long error
    #[error("MessageText cannot exceed {max} characters (got {actual})")]
    MessageTextTooLong { max: usize, actual: usize },
}

/// Errors surfaced by the durable keyed store.
///
/// The store is the only shared mutable resource; a failure here is
/// fatal to the request and never retried by the core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backing store I/O failure
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Failed to encode a value for persistence
    #[error("failed to encode value: {0}")]
    Encoding(String),
}
