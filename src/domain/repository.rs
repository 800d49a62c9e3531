//! 永続化層の抽象（Repository パターン）
//!
//! ドメイン層が RoomStore trait を定義し、Infrastructure 層が具体的な
//! 実装を提供します（依存性の逆転）。プロセス内ロックは持たず、
//! 並行制御はすべてストア側で行います。

use std::time::Duration;

use async_trait::async_trait;

use super::error::StoreError;
use super::value_object::{RoomId, SessionToken};

/// Raw room metadata as persisted.
///
/// `connected_raw` keeps the stored membership representation
/// untouched; callers normalize it with
/// [`decode_connected`](super::entity::decode_connected) at every read
/// boundary rather than trusting a fixed shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRecord {
    /// Stored membership value (JSON array, JSON string, or legacy bare token)
    pub connected_raw: String,
    /// Creation instant, Unix milliseconds
    pub created_at: i64,
}

/// Result of the atomic conditional membership append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAppend {
    /// Token persisted into a free slot
    Appended,
    /// Capacity already reached, nothing written
    Full,
    /// Room metadata absent or expired
    RoomMissing,
}

/// Durable keyed store adapter scoped to rooms.
///
/// The store is the sole shared mutable resource: every authorization
/// check re-reads membership fresh, and `try_append_token` is the one
/// operation that must be atomic (a plain read-then-write would let a
/// third admission slip past the capacity check under concurrent
/// joins).
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Initialize room metadata with an empty membership list and set
    /// the room's expiration.
    async fn create_room(
        &self,
        room_id: &RoomId,
        created_at: i64,
        ttl: Duration,
    ) -> Result<(), StoreError>;

    /// Fetch room metadata. `None` means absent or expired.
    async fn get_room(&self, room_id: &RoomId) -> Result<Option<RoomRecord>, StoreError>;

    /// Atomically append `token` to the membership list if and only if
    /// fewer than `capacity` tokens are present.
    async fn try_append_token(
        &self,
        room_id: &RoomId,
        token: &SessionToken,
        capacity: usize,
    ) -> Result<TokenAppend, StoreError>;

    /// Append an encoded message to the room's ordered log.
    async fn append_message(&self, room_id: &RoomId, entry: String) -> Result<(), StoreError>;

    /// Read the full append-order log for the room.
    async fn get_messages(&self, room_id: &RoomId) -> Result<Vec<String>, StoreError>;

    /// Remaining lifetime of the room metadata key. `None` means
    /// absent or expired.
    async fn room_ttl(&self, room_id: &RoomId) -> Result<Option<Duration>, StoreError>;

    /// Re-arm the expiration of all room-scoped keys (metadata,
    /// message log, chat transport) to the given remaining lifetime so
    /// they expire in lock-step. A no-op for keys already gone.
    async fn refresh_expirations(&self, room_id: &RoomId, ttl: Duration)
    -> Result<(), StoreError>;

    /// Delete the room's metadata, message-log, and chat-transport
    /// keys. Not required to be atomic across the three keys; per-key
    /// expiration reclaims anything left behind.
    async fn delete_room(&self, room_id: &RoomId) -> Result<(), StoreError>;
}
