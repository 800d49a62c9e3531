//! Ephemeral two-party chat room library.
//!
//! A room is created, admits at most two participants identified by
//! opaque session tokens, auto-expires after a fixed lifetime, and can
//! be destroyed early by any participant. All shared state lives in a
//! durable keyed store; mutations visible to the other participant are
//! pushed over a per-room event channel.

pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod logger;
pub mod ui;
pub mod usecase;

// Re-export the server entry point
pub use ui::run;
