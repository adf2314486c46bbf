//! HTTP DTOs for chat endpoints
//!
//! These types decouple the HTTP API from domain types. Wire field names are
//! camelCase, matching the UI client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::chat::UserClass;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// An incoming chat message.
///
/// `message` is required and must be non-empty; `userType` defaults to
/// CUSTOMER; `sessionId` and `userId` are optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub user_type: UserClass,
    #[serde(default)]
    pub user_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Engine status for UI display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatusResponse {
    pub active_engine: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_user_type_to_customer() {
        let json = r#"{"message":"I need a plumber"}"#;
        let req: ChatMessageRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.user_type, UserClass::Customer);
        assert!(req.session_id.is_none());
        assert!(req.user_id.is_none());
    }

    #[test]
    fn request_accepts_full_ui_shape() {
        let json = r#"{"message":"hi","sessionId":"s1","userId":"u1","userType":"TRADESPERSON"}"#;
        let req: ChatMessageRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.user_type, UserClass::Tradesperson);
        assert_eq!(req.session_id.as_deref(), Some("s1"));
        assert_eq!(req.user_id.as_deref(), Some("u1"));
    }

    #[test]
    fn error_response_serializes_code() {
        let error = ErrorResponse::bad_request("Message is required");
        let json = serde_json::to_string(&error).unwrap();

        assert!(json.contains("BAD_REQUEST"));
        assert!(json.contains("Message is required"));
    }

    #[test]
    fn engine_status_serializes_camel_case() {
        let status = EngineStatusResponse {
            active_engine: "ollama".to_string(),
            status: "active".to_string(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("activeEngine"));
    }
}
