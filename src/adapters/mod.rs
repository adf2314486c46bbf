//! Adapters - implementations of ports against external technology.

pub mod ai;
pub mod http;
