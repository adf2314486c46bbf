//! HTTP adapters - REST API implementations.

pub mod chat;

pub use chat::{chat_routes, ChatAppState};
