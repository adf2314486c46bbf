//! Chat backend adapters.
//!
//! Implementations of the ChatBackend port for the supported engines.
//!
//! ## Available Adapters
//!
//! - `OllamaBackend` - local inference server (`/api/chat`)
//! - `OpenAiCompatBackend` - OpenAI-compatible hosted endpoint (Groq)
//! - `XaiBackend` - xAI REST API with its bespoke request shape
//! - `MockChatBackend` - configurable mock for testing
//!
//! The active adapter is chosen once at startup by [`backend_from_config`];
//! there is no per-request dispatch beyond the trait object call.

mod mock;
mod ollama;
mod openai_compat;
mod xai;

pub use mock::{MockChatBackend, MockResponse};
pub use ollama::{OllamaBackend, OllamaConfig};
pub use openai_compat::{OpenAiCompatBackend, OpenAiCompatConfig};
pub use xai::{XaiBackend, XaiConfig};

use std::sync::Arc;

use crate::config::{ChatConfig, EngineKind, ValidationError};
use crate::ports::{BackendError, ChatBackend};

/// Builds the configured backend. Pure function of the engine kind.
///
/// Assumes the configuration already passed [`ChatConfig::validate`]; a
/// hosted engine without an API key still fails here rather than producing
/// an adapter that cannot authenticate.
pub fn backend_from_config(config: &ChatConfig) -> Result<Arc<dyn ChatBackend>, ValidationError> {
    let backend: Arc<dyn ChatBackend> = match config.active_engine {
        EngineKind::Ollama => Arc::new(OllamaBackend::new(
            OllamaConfig::new(&config.endpoint, &config.model)
                .with_temperature(config.temperature)
                .with_top_p(config.top_p)
                .with_timeout(config.timeout()),
        )),
        EngineKind::Groq => {
            let api_key = config
                .api_key()
                .ok_or(ValidationError::MissingApiKey("groq"))?;
            Arc::new(OpenAiCompatBackend::new(
                OpenAiCompatConfig::new(api_key, &config.endpoint, &config.model)
                    .with_temperature(config.temperature)
                    .with_top_p(config.top_p)
                    .with_timeout(config.timeout()),
            ))
        }
        EngineKind::Grok => {
            let api_key = config
                .api_key()
                .ok_or(ValidationError::MissingApiKey("grok"))?;
            Arc::new(XaiBackend::new(
                XaiConfig::new(api_key, &config.endpoint, &config.model)
                    .with_temperature(config.temperature)
                    .with_timeout(config.timeout()),
            ))
        }
    };
    Ok(backend)
}

/// Classifies a reqwest transport error into a [`BackendError`].
fn transport_error(err: reqwest::Error, timeout_secs: u32) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout { timeout_secs }
    } else if err.is_connect() {
        BackendError::network(format!("Connection failed: {err}"))
    } else {
        BackendError::network(err.to_string())
    }
}

/// Maps a non-success HTTP status to a [`BackendError`].
///
/// Consumes the response body for the error message.
async fn status_error(response: reqwest::Response) -> BackendError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    match status.as_u16() {
        401 | 403 => BackendError::AuthenticationFailed,
        400..=499 => BackendError::InvalidRequest(format!("{status}: {body}")),
        500..=599 => BackendError::unavailable(format!("server error {status}: {body}")),
        _ => BackendError::network(format!("unexpected status {status}: {body}")),
    }
}
