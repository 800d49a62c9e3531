//! InMemory RoomStore 実装
//!
//! ドメイン層が定義する RoomStore trait の具体的な実装。
//! HashMap をインメモリ DB として使用し、キーごとの失効は注入された
//! Clock に対して読み取り時に遅延評価します（能動的なスイープは
//! 行わない — 本番の Redis 実装と同じく失効は完全にストア駆動）。
//!
//! 単一の Mutex が `try_append_token` の read-check-append を
//! アトミックにします。開発時のサーバーとテストの両方で使用します。

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::common::time::Clock;
use crate::domain::{
    RoomId, RoomRecord, RoomStore, SessionToken, StoreError, TokenAppend, decode_connected,
    encode_connected,
};

/// ルームごとの永続キー一式（メタデータ・メッセージログ・チャット転送）
struct StoredRoom {
    connected_raw: String,
    created_at: i64,
    messages: Vec<String>,
    /// メタデータキーの失効時刻（Unix ミリ秒）
    meta_expires_at: i64,
    /// メッセージログキーの失効時刻
    log_expires_at: i64,
    /// チャット転送キーの失効時刻
    chat_expires_at: i64,
}

/// インメモリ RoomStore 実装
pub struct InMemoryRoomStore {
    rooms: Mutex<HashMap<String, StoredRoom>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomStore {
    /// 新しい InMemoryRoomStore を作成
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// メッセージログキーの残り TTL（テストのロックステップ検証用）
    pub async fn message_log_ttl(&self, room_id: &RoomId) -> Option<Duration> {
        let now = self.clock.now_millis();
        let rooms = self.rooms.lock().await;
        let room = rooms.get(room_id.as_str())?;
        if room.log_expires_at <= now {
            return None;
        }
        Some(Duration::from_millis((room.log_expires_at - now) as u64))
    }

    fn meta_is_live(room: &StoredRoom, now: i64) -> bool {
        room.meta_expires_at > now
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn create_room(
        &self,
        room_id: &RoomId,
        created_at: i64,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let now = self.clock.now_millis();
        let expires_at = now + ttl.as_millis() as i64;
        let mut rooms = self.rooms.lock().await;
        rooms.insert(
            room_id.as_str().to_string(),
            StoredRoom {
                connected_raw: encode_connected(&[]),
                created_at,
                messages: Vec::new(),
                meta_expires_at: expires_at,
                log_expires_at: expires_at,
                chat_expires_at: expires_at,
            },
        );
        Ok(())
    }

    async fn get_room(&self, room_id: &RoomId) -> Result<Option<RoomRecord>, StoreError> {
        let now = self.clock.now_millis();
        let rooms = self.rooms.lock().await;
        let record = rooms
            .get(room_id.as_str())
            .filter(|room| Self::meta_is_live(room, now))
            .map(|room| RoomRecord {
                connected_raw: room.connected_raw.clone(),
                created_at: room.created_at,
            });
        Ok(record)
    }

    async fn try_append_token(
        &self,
        room_id: &RoomId,
        token: &SessionToken,
        capacity: usize,
    ) -> Result<TokenAppend, StoreError> {
        let now = self.clock.now_millis();
        // 単一ロック下の read-check-append なのでアトミック
        let mut rooms = self.rooms.lock().await;
        let Some(room) = rooms
            .get_mut(room_id.as_str())
            .filter(|room| Self::meta_is_live(room, now))
        else {
            return Ok(TokenAppend::RoomMissing);
        };

        let mut connected = decode_connected(&room.connected_raw);
        if connected.len() >= capacity {
            return Ok(TokenAppend::Full);
        }
        connected.push(token.clone());
        room.connected_raw = encode_connected(&connected);
        Ok(TokenAppend::Appended)
    }

    async fn append_message(&self, room_id: &RoomId, entry: String) -> Result<(), StoreError> {
        let now = self.clock.now_millis();
        let mut rooms = self.rooms.lock().await;
        let Some(room) = rooms.get_mut(room_id.as_str()) else {
            // ルームが消えた後の追記は no-op（バックストップが回収する）
            return Ok(());
        };
        if room.log_expires_at <= now {
            // 失効済みのログキーは存在しないのと同じ。追記はキーを作り直す
            room.messages.clear();
            room.log_expires_at = room.meta_expires_at;
        }
        room.messages.push(entry);
        Ok(())
    }

    async fn get_messages(&self, room_id: &RoomId) -> Result<Vec<String>, StoreError> {
        let now = self.clock.now_millis();
        let rooms = self.rooms.lock().await;
        let entries = rooms
            .get(room_id.as_str())
            .filter(|room| room.log_expires_at > now)
            .map(|room| room.messages.clone())
            .unwrap_or_default();
        Ok(entries)
    }

    async fn room_ttl(&self, room_id: &RoomId) -> Result<Option<Duration>, StoreError> {
        let now = self.clock.now_millis();
        let rooms = self.rooms.lock().await;
        let remaining = rooms
            .get(room_id.as_str())
            .filter(|room| Self::meta_is_live(room, now))
            .map(|room| Duration::from_millis((room.meta_expires_at - now) as u64));
        Ok(remaining)
    }

    async fn refresh_expirations(
        &self,
        room_id: &RoomId,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let now = self.clock.now_millis();
        let expires_at = now + ttl.as_millis() as i64;
        let mut rooms = self.rooms.lock().await;
        if let Some(room) = rooms
            .get_mut(room_id.as_str())
            .filter(|room| Self::meta_is_live(room, now))
        {
            room.meta_expires_at = expires_at;
            room.log_expires_at = expires_at;
            room.chat_expires_at = expires_at;
        }
        Ok(())
    }

    async fn delete_room(&self, room_id: &RoomId) -> Result<(), StoreError> {
        let mut rooms = self.rooms.lock().await;
        rooms.remove(room_id.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::ManualClock;
    use crate::domain::{ROOM_TTL, RoomIdFactory, SessionTokenFactory};

    async fn store_with_room(clock: &Arc<ManualClock>) -> (InMemoryRoomStore, RoomId) {
        let store = InMemoryRoomStore::new(clock.clone());
        let room_id = RoomIdFactory::generate();
        store
            .create_room(&room_id, clock.now_millis(), ROOM_TTL)
            .await
            .unwrap();
        (store, room_id)
    }

    #[tokio::test]
    async fn test_room_disappears_at_expiry_without_delete() {
        // テスト項目: 期限切れのルームは物理削除なしで不可視になる
        // given (前提条件):
        let clock = ManualClock::new(0);
        let (store, room_id) = store_with_room(&clock).await;
        assert!(store.get_room(&room_id).await.unwrap().is_some());

        // when (操作): 失効ちょうどの時刻まで進める
        clock.advance_secs(600);

        // then (期待する結果):
        assert!(store.get_room(&room_id).await.unwrap().is_none());
        assert!(store.room_ttl(&room_id).await.unwrap().is_none());
        assert_eq!(
            store
                .try_append_token(&room_id, &SessionTokenFactory::generate(), 2)
                .await
                .unwrap(),
            TokenAppend::RoomMissing
        );
    }

    #[tokio::test]
    async fn test_try_append_token_enforces_capacity() {
        // テスト項目: 定員に達した後の追記は Full を返し、書き込まない
        // given (前提条件):
        let clock = ManualClock::new(0);
        let (store, room_id) = store_with_room(&clock).await;
        store
            .try_append_token(&room_id, &SessionTokenFactory::generate(), 2)
            .await
            .unwrap();
        store
            .try_append_token(&room_id, &SessionTokenFactory::generate(), 2)
            .await
            .unwrap();

        // when (操作):
        let result = store
            .try_append_token(&room_id, &SessionTokenFactory::generate(), 2)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(result, TokenAppend::Full);
        let record = store.get_room(&room_id).await.unwrap().unwrap();
        assert_eq!(decode_connected(&record.connected_raw).len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_expirations_realigns_all_keys() {
        // テスト項目: refresh は全キーの失効時刻を同じ残り時間に揃える
        // given (前提条件):
        let clock = ManualClock::new(0);
        let (store, room_id) = store_with_room(&clock).await;
        clock.advance_secs(100);

        // when (操作):
        store
            .refresh_expirations(&room_id, Duration::from_secs(500))
            .await
            .unwrap();

        // then (期待する結果):
        let meta = store.room_ttl(&room_id).await.unwrap().unwrap();
        let log = store.message_log_ttl(&room_id).await.unwrap();
        assert_eq!(meta, Duration::from_secs(500));
        assert_eq!(log, meta);
    }

    #[tokio::test]
    async fn test_messages_survive_within_ttl_and_vanish_after() {
        // テスト項目: ログは TTL 内は読め、失効後は空として扱われる
        // given (前提条件):
        let clock = ManualClock::new(0);
        let (store, room_id) = store_with_room(&clock).await;
        store
            .append_message(&room_id, "entry-1".to_string())
            .await
            .unwrap();

        // then (期待する結果): TTL 内は読める
        clock.advance_secs(599);
        assert_eq!(store.get_messages(&room_id).await.unwrap().len(), 1);

        // when (操作): 失効後
        clock.advance_secs(2);

        // then (期待する結果):
        assert!(store.get_messages(&room_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_message_after_delete_is_noop() {
        // テスト項目: 削除済みルームへの追記はエラーにならず何も残さない
        // given (前提条件):
        let clock = ManualClock::new(0);
        let (store, room_id) = store_with_room(&clock).await;
        store.delete_room(&room_id).await.unwrap();

        // when (操作):
        let result = store.append_message(&room_id, "late".to_string()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(store.get_messages(&room_id).await.unwrap().is_empty());
    }
}
