//! Core chat pipeline types.
//!
//! These are the domain-side request/response shapes the orchestrator works
//! with. HTTP DTOs in `adapters::http::chat::dto` map onto them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which side of the marketplace the user is on.
///
/// Selects both the system prompt variant and the extraction schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserClass {
    /// Someone looking to hire a tradesperson.
    #[default]
    Customer,
    /// Someone offering trade services.
    Tradesperson,
}

impl UserClass {
    /// Wire/prompt name of the class.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserClass::Customer => "CUSTOMER",
            UserClass::Tradesperson => "TRADESPERSON",
        }
    }
}

/// An incoming chat message, already validated by the transport layer.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Free-text message from the user. Non-empty.
    pub text: String,
    /// Existing session to continue, if any.
    pub session_id: Option<String>,
    /// User class driving prompt and extraction schema.
    pub user_class: UserClass,
    /// Caller-supplied user identifier, echoed back by the UI endpoint.
    pub user_id: Option<String>,
}

impl ChatRequest {
    /// Creates a request with defaults for the optional fields.
    pub fn new(text: impl Into<String>, user_class: UserClass) -> Self {
        Self {
            text: text.into(),
            session_id: None,
            user_class,
            user_id: None,
        }
    }

    /// Sets the session id.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Sets the user id.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Structured fields derived from a conversation exchange.
///
/// A key that is absent means the information has not been gathered yet;
/// a key that is present with a null-ish or empty value still counts as
/// gathered. The decision engine only looks at key presence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedFields(serde_json::Map<String, Value>);

impl ExtractedFields {
    /// Creates an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Inserts a string field value.
    pub fn insert_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key, Value::String(value.into()));
    }

    /// Returns true if the field key is present, regardless of its value.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Gets a field value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no fields were extracted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over field names and values.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Outcome of processing one chat message.
///
/// Produced fresh per request and never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatOutcome {
    /// Assistant reply text (or the generic apology on failure).
    pub message: String,
    /// Session the exchange belongs to.
    pub session_id: String,
    /// Echo of the caller-supplied user id, when the endpoint opts in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// When the outcome was assembled.
    pub timestamp: DateTime<Utc>,
    /// Fields derived from the exchange.
    pub extracted_info: ExtractedFields,
    /// Next workflow action for the caller.
    pub next_action: String,
    /// Whether the intake still needs more information.
    pub requires_more_info: bool,
}
