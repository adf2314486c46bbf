//! Service entry point: configuration, wiring, HTTP server.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trade_intake::adapters::ai::backend_from_config;
use trade_intake::adapters::http::{chat_routes, ChatAppState};
use trade_intake::config::AppConfig;
use trade_intake::domain::chat::{ChatOrchestrator, PromptBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    let backend = backend_from_config(&config.chat)?;
    info!(
        engine = %backend.info().engine,
        model = %backend.info().model,
        "configured chat backend"
    );

    let prompts = match config.chat.system_message {
        Some(ref message) => PromptBuilder::with_system_message(message),
        None => PromptBuilder::new(),
    };
    let orchestrator = Arc::new(ChatOrchestrator::new(backend, prompts));
    let state = ChatAppState::new(orchestrator, config.chat.active_engine.as_str());

    let cors = build_cors(&config.server.cors_origins_list())?;
    let app = chat_routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors);

    let addr = config.server.socket_addr()?;
    info!(%addr, "starting trade intake service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Permissive CORS by default; restricted when origins are configured.
fn build_cors(origins: &[String]) -> Result<CorsLayer, Box<dyn std::error::Error>> {
    if origins.is_empty() {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let values = origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(values)
        .allow_methods(Any)
        .allow_headers(Any))
}
