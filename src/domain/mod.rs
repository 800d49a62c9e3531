//! Domain layer for the ephemeral chat rooms.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{
    ChatMessage, PARTICIPANT_CAPACITY, ROOM_TTL, ROOM_TTL_SECONDS, RoomMeta, decode_connected,
    encode_connected,
};
pub use error::{StoreError, ValueObjectError};
pub use event::{EventPublisher, RoomEvent};
pub use factory::{MessageIdFactory, RoomIdFactory, SessionTokenFactory};
pub use repository::{RoomRecord, RoomStore, TokenAppend};
pub use value_object::{MessageText, RoomId, SenderName, SessionToken, Timestamp};
