//! UseCase: メッセージ一覧取得（Message Log 読み取り側）
//!
//! 読み取り経路では redaction を行う：リクエスト元自身のトークンと
//! 一致するメッセージだけトークンを残し、それ以外はクリアする。
//! デコードできないログエントリはリクエストを落とさずスキップする。

use std::sync::Arc;

use crate::domain::{ChatMessage, RoomStore, StoreError};

use super::authenticate_session::Session;

/// メッセージ一覧取得のユースケース
pub struct ListMessagesUseCase {
    /// Repository（データアクセス層の抽象化）
    store: Arc<dyn RoomStore>,
}

impl ListMessagesUseCase {
    /// 新しい ListMessagesUseCase を作成
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// メッセージ一覧取得を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ChatMessage>)` - 追記順のメッセージ列（redaction 済み）
    /// * `Err(StoreError)` - ストア障害時のみ失敗
    pub async fn execute(&self, session: &Session) -> Result<Vec<ChatMessage>, StoreError> {
        let entries = self.store.get_messages(&session.room_id).await?;

        let mut messages = Vec::with_capacity(entries.len());
        for entry in entries {
            match serde_json::from_str::<ChatMessage>(&entry) {
                Ok(message) => messages.push(message.redacted_for(&session.token)),
                Err(e) => {
                    // 壊れたエントリは可用性を優先して読み飛ばす
                    tracing::warn!(
                        room_id = %session.room_id,
                        error = %e,
                        "skipping malformed message log entry"
                    );
                }
            }
        }

        Ok(messages)
    }
}
