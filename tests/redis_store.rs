//! RedisRoomStore integration tests.
//!
//! 実サーバーが必要なため通常実行では無効。Redis を起動した上で
//! `REDIS_URL` を指定し `cargo test -- --ignored` で実行する。

use std::time::Duration;

use redis::AsyncCommands;

use tachibanashi::domain::{RoomIdFactory, RoomStore};
use tachibanashi::infrastructure::repository::RedisRoomStore;

fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_append_message_attaches_expiration_to_log_key() {
    // テスト項目: 追記直後からログキーに有効期限が付いている
    //             （refresh を待たずに失効が揃う）
    // given (前提条件):
    let store = RedisRoomStore::new(&redis_url()).await.unwrap();
    let room_id = RoomIdFactory::generate();
    store
        .create_room(&room_id, 0, Duration::from_secs(600))
        .await
        .unwrap();

    // when (操作):
    store
        .append_message(&room_id, "entry-1".to_string())
        .await
        .unwrap();

    // then (期待する結果): ログキーの TTL がメタデータキーの残りに揃う
    let client = redis::Client::open(redis_url().as_str()).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    let log_ttl: i64 = conn.ttl(format!("room:{room_id}:messages")).await.unwrap();
    assert!(log_ttl > 0 && log_ttl <= 600, "log ttl = {log_ttl}");

    store.delete_room(&room_id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_append_message_without_room_is_noop() {
    // テスト項目: ルーム不在時の追記は失効なしのキーを残さない
    // given (前提条件):
    let store = RedisRoomStore::new(&redis_url()).await.unwrap();
    let room_id = RoomIdFactory::generate();

    // when (操作):
    store
        .append_message(&room_id, "orphan".to_string())
        .await
        .unwrap();

    // then (期待する結果): ログキー自体が作られていない
    let client = redis::Client::open(redis_url().as_str()).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    let exists: bool = conn
        .exists(format!("room:{room_id}:messages"))
        .await
        .unwrap();
    assert!(!exists);
}
