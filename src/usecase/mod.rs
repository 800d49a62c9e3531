//! UseCase 層
//!
//! ルームの入室・認証・ライフサイクル・メッセージログを実装する
//! レイヤー。UI 層から呼び出され、Domain 層の trait（RoomStore /
//! EventPublisher）を通じてストアとイベントチャンネルを操作します。

pub mod admit_participant;
pub mod authenticate_session;
pub mod create_room;
pub mod destroy_room;
pub mod error;
pub mod get_room_ttl;
pub mod list_messages;
pub mod post_message;

pub use admit_participant::{AdmitOutcome, AdmitParticipantUseCase, Admission};
pub use authenticate_session::{AuthenticateSessionUseCase, Session};
pub use create_room::CreateRoomUseCase;
pub use destroy_room::DestroyRoomUseCase;
pub use error::{AdmitError, AuthError, CreateRoomError, DestroyRoomError, PostMessageError};
pub use get_room_ttl::GetRoomTtlUseCase;
pub use list_messages::ListMessagesUseCase;
pub use post_message::PostMessageUseCase;
