//! HTTP handlers for chat endpoints
//!
//! Thin transport shell over the chat orchestrator: validate, delegate,
//! serialize. All pipeline failures are already absorbed below this layer,
//! so handlers only ever reject malformed input.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use tracing::info;

use crate::domain::chat::{ChatOrchestrator, ChatOutcome, ChatRequest, UserClass};

use super::dto::{ChatMessageRequest, EngineStatusResponse, ErrorResponse};

/// Liveness string returned by the health endpoint.
const HEALTH_MESSAGE: &str = "Trade intake chat service is running!";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for the chat routes
#[derive(Clone)]
pub struct ChatAppState {
    pub orchestrator: Arc<ChatOrchestrator>,
    pub active_engine: String,
}

impl ChatAppState {
    pub fn new(orchestrator: Arc<ChatOrchestrator>, active_engine: impl Into<String>) -> Self {
        Self {
            orchestrator,
            active_engine: active_engine.into(),
        }
    }
}

type ChatResult = Result<Json<ChatOutcome>, (StatusCode, Json<ErrorResponse>)>;

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// Process a chat message with the request's own user type
///
/// POST /chat/message
pub async fn send_message(
    State(state): State<ChatAppState>,
    Json(req): Json<ChatMessageRequest>,
) -> ChatResult {
    let user_class = req.user_type;
    process(state, req, user_class, false).await
}

/// Process a chat message as a customer, regardless of the body's user type
///
/// POST /chat/customer
pub async fn customer_message(
    State(state): State<ChatAppState>,
    Json(req): Json<ChatMessageRequest>,
) -> ChatResult {
    process(state, req, UserClass::Customer, false).await
}

/// Process a chat message as a tradesperson, regardless of the body's user type
///
/// POST /chat/tradesperson
pub async fn tradesperson_message(
    State(state): State<ChatAppState>,
    Json(req): Json<ChatMessageRequest>,
) -> ChatResult {
    process(state, req, UserClass::Tradesperson, false).await
}

/// Process a UI chat message; echoes the caller's userId in the outcome
///
/// POST /chat/ui
pub async fn ui_message(
    State(state): State<ChatAppState>,
    Json(req): Json<ChatMessageRequest>,
) -> ChatResult {
    let user_class = req.user_type;
    process(state, req, user_class, true).await
}

async fn process(
    state: ChatAppState,
    req: ChatMessageRequest,
    user_class: UserClass,
    echo_user_id: bool,
) -> ChatResult {
    if req.message.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Message is required")),
        ));
    }

    let mut request = ChatRequest::new(req.message, user_class);
    request.session_id = req.session_id;
    request.user_id = req.user_id.clone();

    let mut outcome = state.orchestrator.handle(request).await;
    if echo_user_id {
        outcome.user_id = req.user_id;
    }

    Ok(Json(outcome))
}

/// Clear a session's conversation history
///
/// DELETE /chat/session/{session_id}
pub async fn clear_session(
    State(state): State<ChatAppState>,
    Path(session_id): Path<String>,
) -> StatusCode {
    info!(session_id = %session_id, "clearing session");
    state.orchestrator.clear_session(&session_id);
    StatusCode::OK
}

/// Liveness check
///
/// GET /chat/health
pub async fn health_check() -> &'static str {
    HEALTH_MESSAGE
}

/// Report the configured engine for UI display
///
/// GET /chat/engine-status
pub async fn engine_status(State(state): State<ChatAppState>) -> Json<EngineStatusResponse> {
    Json(EngineStatusResponse {
        active_engine: state.active_engine.clone(),
        status: "active".to_string(),
        timestamp: Utc::now(),
    })
}
