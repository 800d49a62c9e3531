//! UseCase: ルーム破棄処理（Room Lifecycle Manager）
//!
//! 破棄イベントはキー削除より先に発行する。参加者が最終状態を描画する
//! ためのデータがまだ取得できるうちに通知し、後続の読み取りが
//! 「destroyed」ではなく素の「not found」になる競合を避けるため。

use std::sync::Arc;

use crate::domain::{EventPublisher, RoomEvent, RoomStore};

use super::authenticate_session::Session;
use super::error::DestroyRoomError;

/// ルーム破棄のユースケース
pub struct DestroyRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    store: Arc<dyn RoomStore>,
    /// イベントチャンネルへの発行能力
    publisher: Arc<dyn EventPublisher>,
}

impl DestroyRoomUseCase {
    /// 新しい DestroyRoomUseCase を作成
    pub fn new(store: Arc<dyn RoomStore>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { store, publisher }
    }

    /// ルーム破棄を実行
    ///
    /// 3 キーの削除はアトミックでなくてよい。発行と削除の間で落ちても
    /// キーごとの失効がバックストップとして残りを回収する。
    pub async fn execute(&self, session: &Session) -> Result<(), DestroyRoomError> {
        // 1. 削除前に通知する
        self.publisher
            .publish(&session.room_id, RoomEvent::RoomDestroyed)
            .await;

        // 2. チャット転送キー・メタデータキー・メッセージログキーを削除する
        self.store.delete_room(&session.room_id).await?;

        tracing::info!(room_id = %session.room_id, "room destroyed");
        Ok(())
    }
}
