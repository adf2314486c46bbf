//! Chat Backend Port - Interface for LLM completion providers.
//!
//! This port abstracts all interactions with chat-completion backends
//! (Ollama, Groq, xAI), letting the chat pipeline generate replies without
//! coupling to a specific provider's wire format.
//!
//! # Design
//!
//! - One uniform, non-streaming completion call
//! - Provider-agnostic message format
//! - Error types for the common failure modes (network, auth, timeout,
//!   malformed provider response)
//!
//! The active backend is selected once at startup from configuration; there
//! is no per-request provider branching.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for chat-completion backend interactions.
///
/// Implementations connect to an external LLM service and translate between
/// the provider-specific API and our message types. A backend that cannot
/// parse its own provider's response must fail with [`BackendError::Parse`]
/// rather than returning a partial string.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Generate a single completion for the given request.
    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError>;

    /// Get backend information (engine name, model).
    fn info(&self) -> BackendInfo;
}

/// Request for a chat completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt to guide model behavior.
    pub system_prompt: Option<String>,
    /// Conversation messages (history + current user message).
    pub messages: Vec<Message>,
}

impl CompletionRequest {
    /// Creates an empty completion request.
    pub fn new() -> Self {
        Self {
            system_prompt: None,
            messages: Vec::new(),
        }
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Adds a message to the conversation.
    pub fn with_message(mut self, role: MessageRole, content: impl Into<String>) -> Self {
        self.messages.push(Message::new(role, content));
        self
    }
}

impl Default for CompletionRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message.
    pub role: MessageRole,
    /// Message content.
    pub content: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions (guides model behavior).
    System,
    /// User input.
    User,
    /// Assistant (model) response.
    Assistant,
}

impl MessageRole {
    /// Wire name of the role, shared by all three provider formats.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// Backend information for status reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendInfo {
    /// Engine name (e.g., "ollama", "groq", "grok").
    pub engine: String,
    /// Model identifier (e.g., "llama3", "mixtral-8x7b").
    pub model: String,
}

impl BackendInfo {
    /// Creates new backend info.
    pub fn new(engine: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            model: model.into(),
        }
    }
}

/// Chat backend errors.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Provider is unavailable (5xx or connection refused).
    #[error("backend unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Provider rejected the request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl BackendError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Short stage-independent label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            BackendError::Unavailable { .. } => "unavailable",
            BackendError::AuthenticationFailed => "auth",
            BackendError::Network(_) => "network",
            BackendError::Parse(_) => "parse",
            BackendError::InvalidRequest(_) => "invalid_request",
            BackendError::Timeout { .. } => "timeout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_request_builder_works() {
        let request = CompletionRequest::new()
            .with_system_prompt("Be helpful")
            .with_message(MessageRole::User, "Hello");

        assert_eq!(request.system_prompt, Some("Be helpful".to_string()));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, MessageRole::User);
        assert_eq!(request.messages[0].content, "Hello");
    }

    #[test]
    fn message_constructors_work() {
        let system = Message::system("You are helpful");
        let user = Message::user("Hello");
        let assistant = Message::assistant("Hi there");

        assert_eq!(system.role, MessageRole::System);
        assert_eq!(user.role, MessageRole::User);
        assert_eq!(assistant.role, MessageRole::Assistant);
    }

    #[test]
    fn message_role_serializes_lowercase() {
        let json = serde_json::to_string(&MessageRole::User).unwrap();
        assert_eq!(json, "\"user\"");

        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");

        let json = serde_json::to_string(&MessageRole::System).unwrap();
        assert_eq!(json, "\"system\"");
    }

    #[test]
    fn backend_error_displays_correctly() {
        let err = BackendError::Timeout { timeout_secs: 30 };
        assert_eq!(err.to_string(), "request timed out after 30s");

        let err = BackendError::unavailable("server error 503");
        assert_eq!(err.to_string(), "backend unavailable: server error 503");
    }

    #[test]
    fn backend_error_kinds_are_stable() {
        assert_eq!(BackendError::AuthenticationFailed.kind(), "auth");
        assert_eq!(BackendError::network("down").kind(), "network");
        assert_eq!(BackendError::parse("bad json").kind(), "parse");
        assert_eq!(BackendError::Timeout { timeout_secs: 5 }.kind(), "timeout");
    }
}
