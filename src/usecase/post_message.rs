//! UseCase: メッセージ投稿処理（Message Log 書き込み側）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PostMessageUseCase::execute() メソッド
//! - メッセージ投稿処理（追記、イベント発行、有効期限の再設定）
//!
//! ### なぜこのテストが必要か
//! - 認証と投稿の間でルームが消える競合の検出（RoomNotFound）
//! - `chat.message` イベントがトークン込みの完全なメッセージで
//!   発行されることを保証（push 経路は信頼境界の内側）
//! - ルームスコープの全キーがロックステップで失効すること
//!   （フル TTL ではなく「残り」TTL への再設定）を保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：投稿とイベント発行
//! - 異常系：入力制約違反、ルーム消失
//! - エッジケース：TTL 途中経過後の投稿

use std::sync::Arc;

use crate::common::time::Clock;
use crate::domain::{
    ChatMessage, EventPublisher, MessageIdFactory, MessageText, RoomEvent, RoomId, RoomStore,
    SenderName, StoreError, Timestamp,
};

use super::authenticate_session::Session;
use super::error::PostMessageError;

/// メッセージ投稿のユースケース
pub struct PostMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    store: Arc<dyn RoomStore>,
    /// イベントチャンネルへの発行能力
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl PostMessageUseCase {
    /// 新しい PostMessageUseCase を作成
    pub fn new(
        store: Arc<dyn RoomStore>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            publisher,
            clock,
        }
    }

    /// メッセージ投稿を実行
    ///
    /// イベント発行と有効期限の再設定は互いに冪等なので並行に発行する。
    /// 発行されるイベントはトークンを含む完全なメッセージを運ぶ
    /// （redaction は pull 経路だけで行う）。
    ///
    /// # Arguments
    ///
    /// * `session` - 認証済みセッション
    /// * `sender` - 表示名（100 文字以内、必須）
    /// * `text` - 本文（1000 文字以内、必須）
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 追記されたメッセージ
    /// * `Err(PostMessageError)` - 入力違反・ルーム消失・ストア障害
    pub async fn execute(
        &self,
        session: &Session,
        sender: String,
        text: String,
    ) -> Result<ChatMessage, PostMessageError> {
        let sender = SenderName::new(sender)?;
        let text = MessageText::new(text)?;

        // 認証後にルームが期限切れ・破棄されている可能性がある
        if self.store.get_room(&session.room_id).await?.is_none() {
            return Err(PostMessageError::RoomNotFound);
        }

        let message = ChatMessage::new(
            MessageIdFactory::generate(),
            session.room_id.clone(),
            sender,
            text,
            Timestamp::new(self.clock.now_millis()),
            session.token.clone(),
        );

        let entry = serde_json::to_string(&message)
            .map_err(|e| StoreError::Encoding(e.to_string()))?;
        self.store.append_message(&session.room_id, entry).await?;

        let publish = self
            .publisher
            .publish(&session.room_id, RoomEvent::MessagePosted(message.clone()));
        let refresh = self.refresh_room_expirations(&session.room_id);
        let (_, refresh_result) = tokio::join!(publish, refresh);
        refresh_result?;

        tracing::debug!(room_id = %session.room_id, message_id = %message.id, "message posted");
        Ok(message)
    }

    /// ルームスコープの全キーの有効期限をメタデータキーの「残り」TTL に
    /// 合わせて再設定する（フル TTL には戻さない）。
    ///
    /// ルームが投稿直後に消えていた場合は何もしない。キーごとの
    /// 失効がバックストップとして残りを回収する。
    async fn refresh_room_expirations(&self, room_id: &RoomId) -> Result<(), StoreError> {
        match self.store.room_ttl(room_id).await? {
            Some(remaining) => self.store.refresh_expirations(room_id, remaining).await,
            None => Ok(()),
        }
    }
}
