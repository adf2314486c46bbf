//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `TRADE_INTAKE` prefix and nested values use `__` as separator.
//!
//! # Example
//!
//! ```no_run
//! use trade_intake::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod chat;
mod error;
mod server;

pub use chat::{ChatConfig, EngineKind};
pub use error::{ConfigError, ValidationError};
pub use server::ServerConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables,
/// then call [`AppConfig::validate()`] before wiring anything up. A bad
/// engine selector or missing API key must stop the process at startup, not
/// surface mid-request.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration (bind address, timeouts, CORS)
    #[serde(default)]
    pub server: ServerConfig,

    /// Chat backend configuration (engine, endpoint, model, sampling)
    #[serde(default)]
    pub chat: ChatConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` if present (development)
    /// 2. Reads environment variables with the `TRADE_INTAKE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `TRADE_INTAKE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `TRADE_INTAKE__CHAT__ACTIVE_ENGINE=groq` -> `chat.active_engine = groq`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values are missing or cannot be parsed;
    /// an unknown `active_engine` value fails here rather than falling back
    /// to a default engine.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TRADE_INTAKE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.chat.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chat.active_engine, EngineKind::Ollama);
    }

    #[test]
    fn validation_propagates_chat_errors() {
        let config = AppConfig {
            chat: ChatConfig {
                active_engine: EngineKind::Groq,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
