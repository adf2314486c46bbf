//! Chat intake pipeline.
//!
//! Control flow per incoming message: session store (append user message) →
//! prompt builder → backend (primary completion) → session store (append
//! reply) → extraction engine (second completion + parse/fallback) →
//! decision engine → outcome assembly. See [`orchestrator::ChatOrchestrator`].

pub mod decision;
pub mod extraction;
pub mod orchestrator;
pub mod prompt;
pub mod session;
pub mod types;

pub use decision::{
    decide, Decision, ACTION_FIND_TRADESPEOPLE, ACTION_GATHER_MORE_INFO, ACTION_RETRY,
    ACTION_SHOW_JOB_OPPORTUNITIES,
};
pub use extraction::ExtractionEngine;
pub use orchestrator::ChatOrchestrator;
pub use prompt::{PromptBuilder, DEFAULT_SYSTEM_PROMPT};
pub use session::SessionStore;
pub use types::{ChatOutcome, ChatRequest, ExtractedFields, UserClass};
