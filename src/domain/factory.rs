//! Domain factories for generating identifiers and credentials.

use super::value_object::{RoomId, SessionToken};

/// Factory for generating RoomId instances.
///
/// Encapsulates the generation concern, separating it from the
/// validation logic in RoomId.
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// Generate a new RoomId from a random UUID v4.
    pub fn generate() -> RoomId {
        RoomId::from_uuid(uuid::Uuid::new_v4())
    }
}

/// Factory for generating session tokens.
///
/// A UUID v4 carries 122 random bits, which is what makes the token
/// unguessable; the token is never derivable from the room id.
pub struct SessionTokenFactory;

impl SessionTokenFactory {
    /// Generate a fresh unguessable session token.
    pub fn generate() -> SessionToken {
        // A freshly generated UUID string always passes validation
        SessionToken::new(uuid::Uuid::new_v4().to_string())
            .unwrap_or_else(|_| unreachable!("generated token is always valid"))
    }
}

/// Factory for generating message identifiers (unique within a room).
pub struct MessageIdFactory;

impl MessageIdFactory {
    /// Generate a new message identifier.
    pub fn generate() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_factory_generate() {
        // テスト項目: RoomIdFactory::generate() で UUID v4 形式の RoomId を生成できる
        // when (操作):
        let room_id = RoomIdFactory::generate();

        // then (期待する結果): UUID v4 の標準長（ハイフン含む）
        assert_eq!(room_id.as_str().len(), 36);
    }

    #[test]
    fn test_room_id_factory_generate_uniqueness() {
        // テスト項目: RoomIdFactory::generate() は毎回異なる ID を生成する
        // when (操作):
        let room_id1 = RoomIdFactory::generate();
        let room_id2 = RoomIdFactory::generate();

        // then (期待する結果):
        assert_ne!(room_id1, room_id2);
    }

    #[test]
    fn test_session_token_factory_generate_uniqueness() {
        // テスト項目: SessionTokenFactory::generate() は毎回異なるトークンを生成する
        // when (操作):
        let token1 = SessionTokenFactory::generate();
        let token2 = SessionTokenFactory::generate();

        // then (期待する結果):
        assert_ne!(token1, token2);
    }
}
