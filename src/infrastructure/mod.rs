//! Infrastructure 層
//!
//! ドメイン層が定義する trait（RoomStore / EventPublisher）の具体的な
//! 実装と、境界で使う DTO を提供します。

pub mod dto;
pub mod publisher;
pub mod repository;
