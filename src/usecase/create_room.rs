//! UseCase: ルーム作成処理

use std::sync::Arc;

use crate::common::time::Clock;
use crate::domain::{ROOM_TTL, RoomId, RoomIdFactory, RoomStore};

use super::error::CreateRoomError;

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    store: Arc<dyn RoomStore>,
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    /// 新しい CreateRoomUseCase を作成
    pub fn new(store: Arc<dyn RoomStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// ルーム作成を実行
    ///
    /// 推測不能なルーム ID を生成し、空のメンバーシップと作成時刻で
    /// メタデータを初期化して 600 秒の有効期限を設定する。
    ///
    /// # Returns
    ///
    /// * `Ok(RoomId)` - 作成したルームの ID
    /// * `Err(CreateRoomError)` - ストア障害時のみ失敗
    pub async fn execute(&self) -> Result<RoomId, CreateRoomError> {
        let room_id = RoomIdFactory::generate();
        let created_at = self.clock.now_millis();

        self.store
            .create_room(&room_id, created_at, ROOM_TTL)
            .await?;

        tracing::info!(room_id = %room_id, "room created");
        Ok(room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::ManualClock;
    use crate::domain::ROOM_TTL_SECONDS;
    use crate::infrastructure::repository::InMemoryRoomStore;

    #[tokio::test]
    async fn test_create_room_success() {
        // テスト項目: ルームが空のメンバーシップと 600 秒の TTL で作成される
        // given (前提条件):
        let clock = ManualClock::new(1_000_000);
        let store = Arc::new(InMemoryRoomStore::new(clock.clone()));
        let usecase = CreateRoomUseCase::new(store.clone(), clock.clone());

        // when (操作):
        let room_id = usecase.execute().await.unwrap();

        // then (期待する結果):
        let record = store.get_room(&room_id).await.unwrap().unwrap();
        assert_eq!(record.created_at, 1_000_000);
        assert!(crate::domain::decode_connected(&record.connected_raw).is_empty());

        let ttl = store.room_ttl(&room_id).await.unwrap().unwrap();
        assert_eq!(ttl.as_secs(), ROOM_TTL_SECONDS);
    }

    #[tokio::test]
    async fn test_create_room_ids_are_unique() {
        // テスト項目: 連続して作成したルームは異なる ID を持つ
        // given (前提条件):
        let clock = ManualClock::new(0);
        let store = Arc::new(InMemoryRoomStore::new(clock.clone()));
        let usecase = CreateRoomUseCase::new(store, clock);

        // when (操作):
        let id1 = usecase.execute().await.unwrap();
        let id2 = usecase.execute().await.unwrap();

        // then (期待する結果):
        assert_ne!(id1, id2);
    }
}
