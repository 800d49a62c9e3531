//! UseCase: 残り TTL 取得（Room Lifecycle Manager）

use std::sync::Arc;

use crate::domain::{RoomStore, StoreError};

use super::authenticate_session::Session;

/// 残り TTL 取得のユースケース
pub struct GetRoomTtlUseCase {
    /// Repository（データアクセス層の抽象化）
    store: Arc<dyn RoomStore>,
}

impl GetRoomTtlUseCase {
    /// 新しい GetRoomTtlUseCase を作成
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// 残り TTL（秒）を取得
    ///
    /// 期限切れ・不在のルームは削除が走っていなくても 0 を返す。
    /// 負値を返すことはない。
    pub async fn execute(&self, session: &Session) -> Result<u64, StoreError> {
        let remaining = self.store.room_ttl(&session.room_id).await?;
        Ok(remaining.map(|d| d.as_secs()).unwrap_or(0))
    }
}
