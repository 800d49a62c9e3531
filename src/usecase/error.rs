//! UseCase 層のエラー定義
//!
//! 認可エラー（Unauthorized / InvalidToken）は外部には一律の
//! アクセス拒否として提示し、どちらの検証で落ちたかは漏らさない
//! （マッピングは UI 層で行う）。

use thiserror::Error;

use crate::domain::{StoreError, ValueObjectError};

/// ルーム作成のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CreateRoomError {
    /// ストア障害
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// 入室（Admission）のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdmitError {
    /// ルームが存在しない（メタデータ不在または期限切れ）
    #[error("room not found")]
    RoomNotFound,

    /// 定員（2 名）に達している
    #[error("room is full")]
    RoomFull,

    /// ストア障害
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// セッション認証のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// roomId またはトークンがリクエストに無い
    #[error("missing credentials")]
    Unauthorized,

    /// トークンがこのルームのメンバーシップに含まれない
    /// （期限切れ・未入室・破棄済みをすべて含む）
    #[error("token not recognized for this room")]
    InvalidToken,

    /// ストア障害
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// メッセージ投稿のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PostMessageError {
    /// 認証と投稿の間にルームが消えた（期限切れまたは破棄）
    #[error("room not found")]
    RoomNotFound,

    /// 入力値の制約違反
    #[error(transparent)]
    Validation(#[from] ValueObjectError),

    /// ストア障害
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// ルーム破棄のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DestroyRoomError {
    /// ストア障害
    #[error(transparent)]
    Store(#[from] StoreError),
}
