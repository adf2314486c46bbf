//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Backend endpoint must be a http(s) URL")]
    InvalidEndpoint,

    #[error("Temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("Top-p must be between 0.0 and 1.0")]
    InvalidTopP,

    #[error("Engine '{0}' requires an API key")]
    MissingApiKey(&'static str),
}
