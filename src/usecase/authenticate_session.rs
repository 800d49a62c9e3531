//! UseCase: セッション認証（Session Authenticator）
//!
//! ルームスコープの全操作はここを通ってから実行される。
//! メンバーシップは毎回ストアから読み直し、キャッシュは持たない。

use std::sync::Arc;

use crate::domain::{RoomId, RoomStore, SessionToken, decode_connected};

use super::error::AuthError;

/// 認証済みセッションの記述子
///
/// 下流の操作（メッセージログ）が redaction と存在チェックに使う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// 対象ルーム
    pub room_id: RoomId,
    /// リクエスト元のトークン
    pub token: SessionToken,
    /// 認証時点のメンバーシップ（入室順）
    pub connected: Vec<SessionToken>,
}

/// セッション認証のユースケース
pub struct AuthenticateSessionUseCase {
    /// Repository（データアクセス層の抽象化）
    store: Arc<dyn RoomStore>,
}

impl AuthenticateSessionUseCase {
    /// 新しい AuthenticateSessionUseCase を作成
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// セッション認証を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - リクエストのルーム ID（無ければ Unauthorized）
    /// * `token` - 提示されたトークン（無ければ Unauthorized）
    ///
    /// # Returns
    ///
    /// * `Ok(Session)` - 認証成功
    /// * `Err(AuthError)` - 資格情報の欠落または不一致
    pub async fn execute(
        &self,
        room_id: Option<&str>,
        token: Option<&str>,
    ) -> Result<Session, AuthError> {
        let (Some(room_id_str), Some(token_str)) = (room_id, token) else {
            return Err(AuthError::Unauthorized);
        };
        if room_id_str.is_empty() || token_str.is_empty() {
            return Err(AuthError::Unauthorized);
        }

        // 形式不正なルーム ID は存在しえないので InvalidToken に倒す
        let Ok(room_id) = RoomId::new(room_id_str.to_string()) else {
            return Err(AuthError::InvalidToken);
        };

        let Some(record) = self.store.get_room(&room_id).await? else {
            return Err(AuthError::InvalidToken);
        };

        let connected = decode_connected(&record.connected_raw);
        let Some(token) = connected.iter().find(|t| t.as_str() == token_str).cloned() else {
            return Err(AuthError::InvalidToken);
        };

        Ok(Session {
            room_id,
            token,
            connected,
        })
    }
}
