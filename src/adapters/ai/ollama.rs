//! Ollama backend - local inference server adapter.
//!
//! Talks to Ollama's native chat endpoint (`POST {base}/api/chat`) with
//! streaming disabled. Sampling options ride along in the `options` object.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OllamaConfig::new("http://localhost:11434", "llama3")
//!     .with_temperature(0.7)
//!     .with_top_p(0.9);
//!
//! let backend = OllamaBackend::new(config);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{BackendError, BackendInfo, ChatBackend, CompletionRequest};

use super::{status_error, transport_error};

/// Configuration for the Ollama backend.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server.
    pub base_url: String,
    /// Model to use (e.g., "llama3", "mistral").
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Request timeout.
    pub timeout: Duration,
}

impl OllamaConfig {
    /// Creates a new configuration.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
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
}

/// Ollama chat backend implementation.
pub struct OllamaBackend {
    config: OllamaConfig,
    client: Client,
}

impl OllamaBackend {
    /// Creates a new Ollama backend with the given configuration.
    pub fn new(config: OllamaConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.base_url.trim_end_matches('/'))
    }

    fn to_ollama_request(&self, request: &CompletionRequest) -> OllamaRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if let Some(ref prompt) = request.system_prompt {
            messages.push(OllamaMessage {
                role: "system".to_string(),
                content: prompt.clone(),
            });
        }
        for msg in &request.messages {
            messages.push(OllamaMessage {
                role: msg.role.as_str().to_string(),
                content: msg.content.clone(),
            });
        }

        OllamaRequest {
            model: self.config.model.clone(),
            messages,
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
            },
        }
    }
}

#[async_trait]
impl ChatBackend for OllamaBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        let timeout_secs = self.config.timeout.as_secs() as u32;
        let body = self.to_ollama_request(&request);

        let response = self
            .client
            .post(self.chat_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout_secs))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let parsed: OllamaResponse = response
            .json()
            .await
            .map_err(|e| BackendError::parse(format!("Failed to parse Ollama response: {e}")))?;

        Ok(parsed.message.content)
    }

    fn info(&self) -> BackendInfo {
        BackendInfo::new("ollama", &self.config.model)
    }
}

// ----- Ollama API Types -----

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MessageRole;

    #[test]
    fn config_builder_works() {
        let config = OllamaConfig::new("http://localhost:11434", "mistral")
            .with_temperature(0.2)
            .with_top_p(0.8)
            .with_timeout(Duration::from_secs(30));

        assert_eq!(config.model, "mistral");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.top_p, 0.8);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn chat_url_handles_trailing_slash() {
        let backend = OllamaBackend::new(OllamaConfig::new("http://localhost:11434/", "llama3"));
        assert_eq!(backend.chat_url(), "http://localhost:11434/api/chat");
    }

    #[test]
    fn request_translation_places_system_prompt_first() {
        let backend = OllamaBackend::new(OllamaConfig::new("http://localhost:11434", "llama3"));
        let request = CompletionRequest::new()
            .with_system_prompt("Be brief")
            .with_message(MessageRole::User, "Hi")
            .with_message(MessageRole::Assistant, "Hello");

        let wire = backend.to_ollama_request(&request);

        assert!(!wire.stream);
        assert_eq!(wire.messages.len(), 3);
        assert_eq!(wire.messages[0].role, "system");
        assert_eq!(wire.messages[0].content, "Be brief");
        assert_eq!(wire.messages[1].role, "user");
        assert_eq!(wire.messages[2].role, "assistant");
    }

    #[test]
    fn request_translation_without_system_prompt() {
        let backend = OllamaBackend::new(OllamaConfig::new("http://localhost:11434", "llama3"));
        let request = CompletionRequest::new().with_message(MessageRole::User, "Extract this");

        let wire = backend.to_ollama_request(&request);
        assert_eq!(wire.messages.len(), 1);
        assert_eq!(wire.messages[0].role, "user");
    }

    #[test]
    fn response_parses_message_content() {
        let json = r#"{"model":"llama3","message":{"role":"assistant","content":"Hi there"},"done":true}"#;
        let parsed: OllamaResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.message.content, "Hi there");
    }
}
