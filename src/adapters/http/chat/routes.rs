//! Route definitions for chat endpoints

use axum::routing::{delete, get, post};
use axum::Router;

use super::handlers::{
    clear_session, customer_message, engine_status, health_check, send_message,
    tradesperson_message, ui_message, ChatAppState,
};

/// Create the chat router with all endpoints
///
/// # Endpoints
///
/// - `POST /chat/message` - Process a message with the body's user type
/// - `POST /chat/customer` - Process a message as CUSTOMER
/// - `POST /chat/tradesperson` - Process a message as TRADESPERSON
/// - `POST /chat/ui` - UI variant, echoes userId in the outcome
/// - `DELETE /chat/session/{session_id}` - Clear a session
/// - `DELETE /chat/ui/session/{session_id}` - UI alias for the same clear
/// - `GET /chat/health` - Liveness check
/// - `GET /chat/engine-status` - Active engine for UI display
pub fn routes() -> Router<ChatAppState> {
    Router::new()
        .route("/chat/message", post(send_message))
        .route("/chat/customer", post(customer_message))
        .route("/chat/tradesperson", post(tradesperson_message))
        .route("/chat/ui", post(ui_message))
        .route("/chat/session/:session_id", delete(clear_session))
        .route("/chat/ui/session/:session_id", delete(clear_session))
        .route("/chat/health", get(health_check))
        .route("/chat/engine-status", get(engine_status))
}
