//! Trade Intake - Conversational intake for a trades marketplace
//!
//! Routes free-text messages from customers and tradespeople to a pluggable
//! LLM backend, keeps per-session dialogue state, derives structured fields
//! from the model's output, and decides the next workflow action.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
