//! Data transfer objects for the HTTP API and the event channel.

pub mod event;
pub mod http;
