//! OpenAI-compatible backend - hosted chat completions adapter.
//!
//! Used for Groq, whose API mirrors OpenAI's `/chat/completions` shape.
//! Bearer-token auth, non-streaming, single attempt per call; failure
//! handling is degrade-or-fallback upstream, not retry.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{BackendError, BackendInfo, ChatBackend, CompletionRequest};

use super::{status_error, transport_error};

/// Configuration for an OpenAI-compatible backend.
#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Base URL for the API (e.g., "https://api.groq.com/openai/v1").
    pub base_url: String,
    /// Model to use (e.g., "mixtral-8x7b-32768").
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAiCompatConfig {
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
            top_p: 0.9,
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the nucleus sampling cutoff.
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
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

/// OpenAI-compatible chat backend implementation.
pub struct OpenAiCompatBackend {
    config: OpenAiCompatConfig,
    client: Client,
}

impl OpenAiCompatBackend {
    /// Creates a new backend with the given configuration.
    pub fn new(config: OpenAiCompatConfig) -> Self {
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

    fn to_wire_request(&self, request: &CompletionRequest) -> WireRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if let Some(ref prompt) = request.system_prompt {
            messages.push(WireMessage {
                role: "system".to_string(),
                content: prompt.clone(),
            });
        }
        for msg in &request.messages {
            messages.push(WireMessage {
                role: msg.role.as_str().to_string(),
                content: msg.content.clone(),
            });
        }

        WireRequest {
            model: self.config.model.clone(),
            messages,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            stream: false,
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAiCompatBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        let timeout_secs = self.config.timeout.as_secs() as u32;
        let body = self.to_wire_request(&request);

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

        let parsed: WireResponse = response
            .json()
            .await
            .map_err(|e| BackendError::parse(format!("Failed to parse response: {e}")))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::parse("No choices in response"))?;

        Ok(choice.message.content)
    }

    fn info(&self) -> BackendInfo {
        BackendInfo::new("groq", &self.config.model)
    }
}

// ----- OpenAI-compatible API Types -----

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}
