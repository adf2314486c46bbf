//! Chat backend configuration
//!
//! Loaded once at startup and immutable for the process lifetime. The
//! engine selector is a closed enum, so an unknown engine name fails
//! configuration loading instead of silently defaulting; `ollama` remains
//! the default only when the selector is absent entirely.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Chat backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Which completion engine handles chat and extraction calls
    #[serde(default)]
    pub active_engine: EngineKind,

    /// Base URL of the engine's API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name passed to the engine
    #[serde(default = "default_model")]
    pub model: String,

    /// API key, required for the hosted engines (groq, grok)
    pub api_key: Option<Secret<String>>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling cutoff
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Per-completion request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Override for the base system instruction
    pub system_message: Option<String>,
}

/// Completion engine selector.
///
/// `ollama` is a local inference server, `groq` an OpenAI-compatible hosted
/// endpoint, and `grok` the xAI REST API with its own request shape.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    #[default]
    Ollama,
    Groq,
    Grok,
}

impl EngineKind {
    /// Engine name as reported by the status endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Ollama => "ollama",
            EngineKind::Groq => "groq",
            EngineKind::Grok => "grok",
        }
    }

    /// Whether this engine authenticates with an API key.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, EngineKind::Groq | EngineKind::Grok)
    }
}

impl ChatConfig {
    /// Get the completion timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Exposed API key, if configured and non-empty
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret().as_str())
            .filter(|k| !k.is_empty())
    }

    /// Validate chat backend configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ValidationError::InvalidEndpoint);
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("chat.model"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(ValidationError::InvalidTopP);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.active_engine.requires_api_key() && self.api_key().is_none() {
            return Err(ValidationError::MissingApiKey(self.active_engine.as_str()));
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            active_engine: EngineKind::default(),
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            temperature: default_temperature(),
            top_p: default_top_p(),
            timeout_secs: default_timeout(),
            system_message: None,
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.9
}

fn default_timeout() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_local_engine() {
        let config = ChatConfig::default();
        assert_eq!(config.active_engine, EngineKind::Ollama);
        assert_eq!(config.endpoint, "http://localhost:11434");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn engine_kind_deserializes_lowercase() {
        let kind: EngineKind = serde_json::from_str("\"groq\"").unwrap();
        assert_eq!(kind, EngineKind::Groq);
    }

    #[test]
    fn unknown_engine_fails_deserialization() {
        let result: Result<EngineKind, _> = serde_json::from_str("\"bedrock\"");
        assert!(result.is_err());
    }

    #[test]
    fn hosted_engine_without_api_key_fails_validation() {
        let config = ChatConfig {
            active_engine: EngineKind::Groq,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingApiKey("groq"))
        ));
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let config = ChatConfig {
            active_engine: EngineKind::Grok,
            api_key: Some(Secret::new(String::new())),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn hosted_engine_with_api_key_passes() {
        let config = ChatConfig {
            active_engine: EngineKind::Grok,
            api_key: Some(Secret::new("xai-123".to_string())),
            endpoint: "https://api.x.ai/v1".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.api_key(), Some("xai-123"));
    }

    #[test]
    fn non_http_endpoint_is_rejected() {
        let config = ChatConfig {
            endpoint: "localhost:11434".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidEndpoint)
        ));
    }

    #[test]
    fn out_of_range_sampling_is_rejected() {
        let config = ChatConfig {
            temperature: 3.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ChatConfig {
            top_p: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn timeout_duration_conversion() {
        let config = ChatConfig {
            timeout_secs: 30,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }
}
