//! Domain logic.

pub mod chat;
