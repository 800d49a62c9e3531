//! UseCase: 入室処理（Admission Controller）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AdmitParticipantUseCase::execute() メソッド
//! - 入室処理（再入室の冪等性、定員チェック、トークン発行）
//!
//! ### なぜこのテストが必要か
//! - 2 名定員の不変条件：並行入室でも 3 人目が入れないことを保証
//! - 既存トークンの再提示が同じトークンを返すこと（ページリロード）
//! - トークンはストアに永続化されてから呼び出し元に渡ること
//!
//! ### どのような状況を想定しているか
//! - 正常系：空室・1 名在室での新規入室
//! - 異常系：満室、存在しない／期限切れのルーム
//! - エッジケース：N 並行入室の競合

use std::sync::Arc;

use crate::domain::{
    PARTICIPANT_CAPACITY, RoomId, RoomStore, SessionToken, SessionTokenFactory, TokenAppend,
    decode_connected,
};

use super::error::AdmitError;

/// 入室結果の区別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitOutcome {
    /// 新しいトークンを発行して入室した
    Admitted,
    /// 提示されたトークンが既にメンバーだった（冪等な再入室）
    Reuse,
}

/// 入室の成功結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    /// セッショントークン（新規発行または提示されたものをそのまま）
    pub token: SessionToken,
    /// 入室の種別
    pub outcome: AdmitOutcome,
}

/// 入室のユースケース
pub struct AdmitParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    store: Arc<dyn RoomStore>,
}

impl AdmitParticipantUseCase {
    /// 新しい AdmitParticipantUseCase を作成
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// 入室を実行
    ///
    /// 定員チェックと追記はストアの単一アトミック操作
    /// （`try_append_token`）で行う。read-then-write に分けると並行入室で
    /// 定員超過が起こるため、ここでは容量の事前チェックをしない。
    ///
    /// # Arguments
    ///
    /// * `room_id` - 入室するルームの ID
    /// * `presented_token` - Cookie などで提示された既存トークン（あれば）
    ///
    /// # Returns
    ///
    /// * `Ok(Admission)` - 入室成功（新規 or 再入室）
    /// * `Err(AdmitError)` - ルーム不在・満室・ストア障害
    pub async fn execute(
        &self,
        room_id: &RoomId,
        presented_token: Option<&str>,
    ) -> Result<Admission, AdmitError> {
        let Some(record) = self.store.get_room(room_id).await? else {
            return Err(AdmitError::RoomNotFound);
        };

        // 再入室は読み取りだけで完結する（冪等）
        if let Some(presented) = presented_token.filter(|t| !t.is_empty()) {
            let connected = decode_connected(&record.connected_raw);
            if let Some(token) = connected.iter().find(|t| t.as_str() == presented) {
                tracing::debug!(room_id = %room_id, "participant re-entered with existing token");
                return Ok(Admission {
                    token: token.clone(),
                    outcome: AdmitOutcome::Reuse,
                });
            }
        }

        let token = SessionTokenFactory::generate();
        match self
            .store
            .try_append_token(room_id, &token, PARTICIPANT_CAPACITY)
            .await?
        {
            TokenAppend::Appended => {
                tracing::info!(room_id = %room_id, "participant admitted");
                Ok(Admission {
                    token,
                    outcome: AdmitOutcome::Admitted,
                })
            }
            TokenAppend::Full => Err(AdmitError::RoomFull),
            TokenAppend::RoomMissing => Err(AdmitError::RoomNotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::{Clock, ManualClock};
    use crate::domain::{ROOM_TTL, RoomIdFactory};
    use crate::infrastructure::repository::InMemoryRoomStore;

    async fn create_room(store: &InMemoryRoomStore, clock: &ManualClock) -> RoomId {
        let room_id = RoomIdFactory::generate();
        store
            .create_room(&room_id, clock.now_millis(), ROOM_TTL)
            .await
            .unwrap();
        room_id
    }

    #[tokio::test]
    async fn test_admit_two_participants_then_full() {
        // テスト項目: 2 名まで入室でき、3 人目は RoomFull になる
        // given (前提条件):
        let clock = ManualClock::new(0);
        let store = Arc::new(InMemoryRoomStore::new(clock.clone()));
        let room_id = create_room(&store, &clock).await;
        let usecase = AdmitParticipantUseCase::new(store.clone());

        // when (操作):
        let first = usecase.execute(&room_id, None).await.unwrap();
        let second = usecase.execute(&room_id, None).await.unwrap();
        let third = usecase.execute(&room_id, None).await;

        // then (期待する結果):
        assert_eq!(first.outcome, AdmitOutcome::Admitted);
        assert_eq!(second.outcome, AdmitOutcome::Admitted);
        assert_ne!(first.token, second.token);
        assert_eq!(third.unwrap_err(), AdmitError::RoomFull);

        // メンバーシップは入室順で 2 件のまま
        let record = store.get_room(&room_id).await.unwrap().unwrap();
        let connected = decode_connected(&record.connected_raw);
        assert_eq!(connected, vec![first.token, second.token]);
    }

    #[tokio::test]
    async fn test_admit_reuse_is_idempotent() {
        // テスト項目: 既存トークンの再提示は同じトークンを返し、重複追加しない
        // given (前提条件):
        let clock = ManualClock::new(0);
        let store = Arc::new(InMemoryRoomStore::new(clock.clone()));
        let room_id = create_room(&store, &clock).await;
        let usecase = AdmitParticipantUseCase::new(store.clone());
        let admission = usecase.execute(&room_id, None).await.unwrap();

        // when (操作): 同じトークンで再入室を 2 回試みる
        let reuse1 = usecase
            .execute(&room_id, Some(admission.token.as_str()))
            .await
            .unwrap();
        let reuse2 = usecase
            .execute(&room_id, Some(admission.token.as_str()))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(reuse1.outcome, AdmitOutcome::Reuse);
        assert_eq!(reuse1.token, admission.token);
        assert_eq!(reuse2.token, admission.token);

        let record = store.get_room(&room_id).await.unwrap().unwrap();
        assert_eq!(decode_connected(&record.connected_raw).len(), 1);
    }

    #[tokio::test]
    async fn test_admit_unknown_room_not_found() {
        // テスト項目: 存在しないルームへの入室は RoomNotFound になる
        // given (前提条件):
        let clock = ManualClock::new(0);
        let store = Arc::new(InMemoryRoomStore::new(clock.clone()));
        let usecase = AdmitParticipantUseCase::new(store);

        // when (操作):
        let result = usecase.execute(&RoomIdFactory::generate(), None).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), AdmitError::RoomNotFound);
    }

    #[tokio::test]
    async fn test_admit_expired_room_not_found() {
        // テスト項目: 期限切れのルームは物理削除前でも存在しない扱いになる
        // given (前提条件):
        let clock = ManualClock::new(0);
        let store = Arc::new(InMemoryRoomStore::new(clock.clone()));
        let room_id = create_room(&store, &clock).await;
        let usecase = AdmitParticipantUseCase::new(store);

        // when (操作): TTL を超えて時間を進める
        clock.advance_secs(601);
        let result = usecase.execute(&room_id, None).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), AdmitError::RoomNotFound);
    }

    #[tokio::test]
    async fn test_admit_unknown_presented_token_gets_fresh_one() {
        // テスト項目: メンバーでないトークンを提示しても新規発行で入室できる
        // given (前提条件):
        let clock = ManualClock::new(0);
        let store = Arc::new(InMemoryRoomStore::new(clock.clone()));
        let room_id = create_room(&store, &clock).await;
        let usecase = AdmitParticipantUseCase::new(store);

        // when (操作): 別ルームのトークンを提示する
        let result = usecase
            .execute(&room_id, Some("stale-token-from-elsewhere"))
            .await
            .unwrap();

        // then (期待する結果): 提示したものとは別の新しいトークン
        assert_eq!(result.outcome, AdmitOutcome::Admitted);
        assert_ne!(result.token.as_str(), "stale-token-from-elsewhere");
    }

    #[tokio::test]
    async fn test_admit_concurrent_callers_respect_capacity() {
        // テスト項目: 10 並行入室でもちょうど 2 名だけが Admitted になる
        // given (前提条件):
        let clock = ManualClock::new(0);
        let store = Arc::new(InMemoryRoomStore::new(clock.clone()));
        let room_id = create_room(&store, &clock).await;
        let usecase = Arc::new(AdmitParticipantUseCase::new(store.clone()));

        // when (操作): 10 タスクが同時に入室を試みる
        let mut handles = Vec::new();
        for _ in 0..10 {
            let usecase = usecase.clone();
            let room_id = room_id.clone();
            handles.push(tokio::spawn(async move {
                usecase.execute(&room_id, None).await
            }));
        }

        let mut admitted = 0;
        let mut full = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(admission) => {
                    assert_eq!(admission.outcome, AdmitOutcome::Admitted);
                    admitted += 1;
                }
                Err(AdmitError::RoomFull) => full += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        // then (期待する結果):
        assert_eq!(admitted, 2);
        assert_eq!(full, 8);

        let record = store.get_room(&room_id).await.unwrap().unwrap();
        assert_eq!(decode_connected(&record.connected_raw).len(), 2);
    }
}
