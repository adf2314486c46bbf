//! Ports - interfaces between the chat pipeline and the outside world.
//!
//! The only port is the chat backend: an external LLM completion provider
//! reached over a network call. Adapters live in `crate::adapters::ai`.

mod chat_backend;

pub use chat_backend::{
    BackendError, BackendInfo, ChatBackend, CompletionRequest, Message, MessageRole,
};
