//! HTTP / WebSocket edge for the chat rooms.

pub mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{build_router, run};
