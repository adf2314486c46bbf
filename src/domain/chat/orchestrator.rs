//! Chat orchestration: one incoming message, end to end.
//!
//! Ties the session store, prompt builder, backend, extraction engine and
//! decision logic together. The orchestrator never raises to its caller:
//! a primary-completion failure is converted into a degraded outcome with a
//! generic apology and `next_action = "retry"`, while extraction failures
//! are absorbed inside the extraction engine with a smaller blast radius
//! (keyword fallback only).

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, instrument};

use crate::ports::{ChatBackend, Message};

use super::decision::{decide, ACTION_RETRY};
use super::extraction::ExtractionEngine;
use super::prompt::PromptBuilder;
use super::session::SessionStore;
use super::types::{ChatOutcome, ChatRequest, ExtractedFields};

/// Apology returned when the primary completion fails.
const DEGRADED_REPLY: &str =
    "I'm sorry, I'm having trouble processing your request right now. Please try again.";

/// Orchestrates the chat pipeline for incoming messages.
pub struct ChatOrchestrator {
    backend: Arc<dyn ChatBackend>,
    sessions: SessionStore,
    prompts: PromptBuilder,
    extractor: ExtractionEngine,
}

impl ChatOrchestrator {
    /// Creates an orchestrator around the given backend.
    pub fn new(backend: Arc<dyn ChatBackend>, prompts: PromptBuilder) -> Self {
        let extractor = ExtractionEngine::new(Arc::clone(&backend));
        Self {
            backend,
            sessions: SessionStore::new(),
            prompts,
            extractor,
        }
    }

    /// Processes one chat message and produces an outcome. Infallible.
    #[instrument(skip(self, request), fields(user_class = request.user_class.as_str()))]
    pub async fn handle(&self, request: ChatRequest) -> ChatOutcome {
        let session_id = request
            .session_id
            .clone()
            .unwrap_or_else(SessionStore::generate_session_id);

        info!(
            session_id = %session_id,
            engine = %self.backend.info().engine,
            "processing chat message"
        );

        let prior_history = self.sessions.history(&session_id);
        self.sessions
            .append(&session_id, Message::user(&request.text));

        let completion =
            self.prompts
                .build(request.user_class, &prior_history, &request.text);

        let reply = match self.backend.complete(completion).await {
            Ok(reply) => reply,
            Err(err) => {
                error!(
                    session_id = %session_id,
                    engine = %self.backend.info().engine,
                    stage = "primary_completion",
                    error = %err,
                    kind = err.kind(),
                    "chat completion failed, returning degraded outcome"
                );
                return degraded_outcome(session_id);
            }
        };

        self.sessions
            .append(&session_id, Message::assistant(&reply));

        let fields = self
            .extractor
            .extract(request.user_class, &request.text, &reply)
            .await;
        let decision = decide(&fields, request.user_class);

        ChatOutcome {
            message: reply,
            session_id,
            user_id: None,
            timestamp: Utc::now(),
            extracted_info: fields,
            next_action: decision.next_action.to_string(),
            requires_more_info: decision.requires_more_info,
        }
    }

    /// Clears a session's history. Pass-through to the session store.
    pub fn clear_session(&self, session_id: &str) {
        self.sessions.clear(session_id);
        info!(session_id = %session_id, "cleared conversation history");
    }

    /// Snapshot of a session's history, for inspection in tests.
    pub fn session_history(&self, session_id: &str) -> Vec<Message> {
        self.sessions.history(session_id)
    }
}

/// Degraded outcome: apology, empty field set, retry action.
fn degraded_outcome(session_id: String) -> ChatOutcome {
    ChatOutcome {
        message: DEGRADED_REPLY.to_string(),
        session_id,
        user_id: None,
        timestamp: Utc::now(),
        extracted_info: ExtractedFields::new(),
        next_action: ACTION_RETRY.to_string(),
        requires_more_info: false,
    }
}
