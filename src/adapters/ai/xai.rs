//! xAI backend - bespoke REST provider adapter.
//!
//! The xAI API is reached with its own request shape: the system prompt and
//! the current user message are flattened into a single user-role message,
//! and the response is parsed as loose JSON rather than a typed DTO. Prior
//! history is not forwarded; this provider only ever sees the current
//! exchange.
//!
//! A response that does not contain `choices[0].message.content` is a
//! [`BackendError::Parse`], never a silently substituted string.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::ports::{BackendError, BackendInfo, ChatBackend, CompletionRequest, MessageRole};

use super::{status_error, transport_error};

/// Configuration for the xAI backend.
#[derive(Debug, Clone)]
pub struct XaiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Base URL for the API (e.g., "https://api.x.ai/v1").
    pub base_url: String,
    /// Model to use (e.g., "grok-beta").
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout.
    pub timeout: Duration,
}

impl XaiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: base_url.into(),
            model: model.into(),
            temperature: 0.7,
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// xAI chat backend implementation.
pub struct XaiBackend {
    config: XaiConfig,
    client: Client,
}

impl XaiBackend {
    /// Creates a new xAI backend with the given configuration.
    pub fn new(config: XaiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Flattens the uniform request into xAI's single-message shape.
    ///
    /// The most recent user message is the payload; when a system prompt is
    /// present it is prepended with a `User:` marker, mirroring how this
    /// provider is driven for both chat and extraction calls.
    fn flatten(request: &CompletionRequest) -> String {
        let user_text = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        match request.system_prompt {
            Some(ref prompt) => format!("{prompt}\n\nUser: {user_text}"),
            None => user_text.to_string(),
        }
    }

    /// Pulls the reply text out of the provider's loose JSON response.
    fn reply_text(body: &Value) -> Result<String, BackendError> {
        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                BackendError::parse("Response missing choices[0].message.content")
            })
    }
}

#[async_trait]
impl ChatBackend for XaiBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        let timeout_secs = self.config.timeout.as_secs() as u32;
        let body = XaiRequest {
            model: self.config.model.clone(),
            messages: vec![XaiMessage {
                role: "user".to_string(),
                content: Self::flatten(&request),
            }],
            temperature: self.config.temperature,
            stream: false,
        };

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout_secs))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let parsed: Value = response
            .json()
            .await
            .map_err(|e| BackendError::parse(format!("Failed to parse xAI response: {e}")))?;

        Self::reply_text(&parsed)
    }

    fn info(&self) -> BackendInfo {
        BackendInfo::new("grok", &self.config.model)
    }
}

// ----- xAI API Types -----

#[derive(Debug, Serialize)]
struct XaiRequest {
    model: String,
    messages: Vec<XaiMessage>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct XaiMessage {
    role: String,
    content: String,
}
