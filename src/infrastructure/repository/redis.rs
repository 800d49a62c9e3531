//! Redis RoomStore 実装
//!
//! # Key Patterns
//!
//! - `room:{id}:meta` - ルームメタデータ（HASH: `created_at`, `connected`）
//! - `room:{id}:messages` - メッセージログ（LIST、追記順）
//! - `room:{id}:chat` - イベントチャンネル転送の管理キー
//!
//! 3 キーはすべて同じ有効期限を持ち、投稿のたびにメタデータキーの
//! 「残り」TTL に揃え直されます。ルームの消滅はキーごとの失効のみで
//! 保証され、スイープタスクは存在しません。
//!
//! # Connection Pattern
//!
//! redis-rs の `MultiplexedConnection` は clone が安価で並行利用できる
//! 設計のため、ロックは持たず操作ごとに clone します。
//!
//! 定員チェック付きのメンバーシップ追記は Lua スクリプトで
//! アトミックに行います（read-then-write に分けると並行入室で
//! 定員超過が起こる）。

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, Script};
use tracing::{error, warn};

use crate::domain::{RoomId, RoomRecord, RoomStore, SessionToken, StoreError, TokenAppend};

/// 定員チェック付きメンバーシップ追記の Lua スクリプト
///
/// Arguments:
/// - KEYS[1]: メタデータキー（`room:{id}:meta`）
/// - ARGV[1]: 追記するトークン
/// - ARGV[2]: 定員
///
/// Returns:
/// - 1: 追記成功
/// - 0: 満室（何も書かない）
/// - -1: ルーム不在
///
/// 保存形式の揺れ（JSON 配列／JSON 文字列／旧形式の生トークン）は
/// ここでも読み取り境界で正規化する。
const TRY_APPEND_TOKEN: &str = r#"
local raw = redis.call('HGET', KEYS[1], 'connected')
if raw == false then
    return -1
end

local tokens
local ok, decoded = pcall(cjson.decode, raw)
if ok and type(decoded) == 'table' then
    tokens = decoded
elseif ok and type(decoded) == 'string' then
    tokens = { decoded }
elseif raw == '' then
    tokens = {}
else
    tokens = { raw }
end

if #tokens >= tonumber(ARGV[2]) then
    return 0
end

tokens[#tokens + 1] = ARGV[1]
redis.call('HSET', KEYS[1], 'connected', cjson.encode(tokens))
return 1
"#;

/// Redis を使った RoomStore 実装
#[derive(Clone)]
pub struct RedisRoomStore {
    /// Redis client（再接続シナリオのために保持）
    #[allow(dead_code)]
    client: Client,
    /// Multiplexed connection（clone が安価、並行利用可）
    connection: MultiplexedConnection,
    /// コンパイル済み Lua スクリプト
    try_append_script: Script,
}

impl RedisRoomStore {
    /// 新しい RedisRoomStore を作成
    ///
    /// # Arguments
    ///
    /// * `redis_url` - 接続 URL（例: `redis://localhost:6379`）
    ///
    /// # Errors
    ///
    /// 接続に失敗すると `StoreError::Unavailable` を返す。
    pub async fn new(redis_url: &str) -> Result<Self, StoreError> {
        let client = Client::open(redis_url).map_err(|e| {
            // URL は資格情報を含みうるのでログに出さない
            error!(error = %e, "failed to open Redis client");
            StoreError::Unavailable(format!("failed to open Redis client: {e}"))
        })?;

        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                error!(error = %e, "failed to connect to Redis");
                StoreError::Unavailable(format!("failed to connect to Redis: {e}"))
            })?;

        Ok(Self {
            client,
            connection,
            try_append_script: Script::new(TRY_APPEND_TOKEN),
        })
    }

    fn meta_key(room_id: &RoomId) -> String {
        format!("room:{room_id}:meta")
    }

    fn messages_key(room_id: &RoomId) -> String {
        format!("room:{room_id}:messages")
    }

    fn chat_key(room_id: &RoomId) -> String {
        format!("room:{room_id}:chat")
    }

    fn unavailable(context: &str, e: redis::RedisError) -> StoreError {
        warn!(error = %e, "{context}");
        StoreError::Unavailable(format!("{context}: {e}"))
    }
}

#[async_trait]
impl RoomStore for RedisRoomStore {
    async fn create_room(
        &self,
        room_id: &RoomId,
        created_at: i64,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        let ttl_secs = ttl.as_secs() as i64;

        let _: () = redis::pipe()
            .atomic()
            .hset(Self::meta_key(room_id), "created_at", created_at)
            .hset(Self::meta_key(room_id), "connected", "[]")
            .expire(Self::meta_key(room_id), ttl_secs)
            .set(Self::chat_key(room_id), 1)
            .expire(Self::chat_key(room_id), ttl_secs)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::unavailable("failed to create room", e))?;

        Ok(())
    }

    async fn get_room(&self, room_id: &RoomId) -> Result<Option<RoomRecord>, StoreError> {
        let mut conn = self.connection.clone();

        let fields: std::collections::HashMap<String, String> = conn
            .hgetall(Self::meta_key(room_id))
            .await
            .map_err(|e| Self::unavailable("failed to read room metadata", e))?;

        if fields.is_empty() {
            return Ok(None);
        }

        let created_at = fields
            .get("created_at")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let connected_raw = fields.get("connected").cloned().unwrap_or_default();

        Ok(Some(RoomRecord {
            connected_raw,
            created_at,
        }))
    }

    async fn try_append_token(
        &self,
        room_id: &RoomId,
        token: &SessionToken,
        capacity: usize,
    ) -> Result<TokenAppend, StoreError> {
        let mut conn = self.connection.clone();

        let result: i64 = self
            .try_append_script
            .key(Self::meta_key(room_id))
            .arg(token.as_str())
            .arg(capacity)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| Self::unavailable("failed to append membership token", e))?;

        match result {
            1 => Ok(TokenAppend::Appended),
            0 => Ok(TokenAppend::Full),
            _ => Ok(TokenAppend::RoomMissing),
        }
    }

    async fn append_message(&self, room_id: &RoomId, entry: String) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();

        // RPUSH はキーを失効なしで作るため、メタデータキーの残り TTL を
        // 追記と同じパイプラインで付け直す。ルームが既に消えていれば
        // 何も書かない（不滅キーを作らない）
        let meta_ttl: i64 = conn
            .ttl(Self::meta_key(room_id))
            .await
            .map_err(|e| Self::unavailable("failed to read room ttl", e))?;
        if meta_ttl < 0 {
            return Ok(());
        }

        let _: () = redis::pipe()
            .rpush(Self::messages_key(room_id), entry)
            .expire(Self::messages_key(room_id), meta_ttl)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::unavailable("failed to append message", e))?;
        Ok(())
    }

    async fn get_messages(&self, room_id: &RoomId) -> Result<Vec<String>, StoreError> {
        let mut conn = self.connection.clone();
        let entries: Vec<String> = conn
            .lrange(Self::messages_key(room_id), 0, -1)
            .await
            .map_err(|e| Self::unavailable("failed to read message log", e))?;
        Ok(entries)
    }

    async fn room_ttl(&self, room_id: &RoomId) -> Result<Option<Duration>, StoreError> {
        let mut conn = self.connection.clone();
        // TTL: -2 = キー不在, -1 = 失効なし
        let ttl: i64 = conn
            .ttl(Self::meta_key(room_id))
            .await
            .map_err(|e| Self::unavailable("failed to read room ttl", e))?;

        if ttl < 0 {
            return Ok(None);
        }
        Ok(Some(Duration::from_secs(ttl as u64)))
    }

    async fn refresh_expirations(
        &self,
        room_id: &RoomId,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        let ttl_secs = ttl.as_secs() as i64;

        // EXPIRE は不在キーには no-op。3 キーの失効をロックステップに揃える
        let _: () = redis::pipe()
            .expire(Self::meta_key(room_id), ttl_secs)
            .expire(Self::messages_key(room_id), ttl_secs)
            .expire(Self::chat_key(room_id), ttl_secs)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::unavailable("failed to refresh expirations", e))?;

        Ok(())
    }

    async fn delete_room(&self, room_id: &RoomId) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        let keys = vec![
            Self::chat_key(room_id),
            Self::meta_key(room_id),
            Self::messages_key(room_id),
        ];

        let _: () = conn
            .del(&keys)
            .await
            .map_err(|e| Self::unavailable("failed to delete room keys", e))?;

        Ok(())
    }
}
