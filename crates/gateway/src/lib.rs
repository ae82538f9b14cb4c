//! HTTP gateway for bankbot.
//!
//! Exposes the endpoints the web client talks to:
//!
//! - `POST /api/message`   — one conversational turn through the pipeline
//! - `GET  /bank/validate` — account number allow-list check
//! - `GET  /bank/locate`   — branch lookup stub
//! - `GET  /health`        — liveness and configuration status
//!
//! Anything else falls through to the static UI directory when one exists.
//! Built on Axum.

pub mod api;
pub mod bank;

#[cfg(test)]
pub(crate) mod test_support;

use axum::extract::DefaultBodyLimit;
use axum::{Router, extract::State, response::Json, routing::get};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::{debug, info, warn};

use bankbot_actions::BankDirectory;
use bankbot_assistant::WatsonAssistant;
use bankbot_config::{AppConfig, ConfigError, GatewayConfig};
use bankbot_pipeline::MessagePipeline;

/// Shared application state for the gateway. Immutable after startup.
pub struct GatewayState {
    pub pipeline: Arc<MessagePipeline>,
    pub bank: Arc<BankDirectory>,
    /// Pass the engine's error body through to clients.
    pub expose_engine_errors: bool,
}

pub type SharedState = Arc<GatewayState>;

/// Build the API routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(api::api_router())
        .merge(bank::bank_router())
        .with_state(state)
}

/// Build the full application: API routes, static fallback, and layers.
pub fn build_app(state: SharedState, config: &GatewayConfig) -> Router {
    let mut app = build_router(state);

    let static_dir = Path::new(&config.static_dir);
    if static_dir.is_dir() {
        info!(dir = %static_dir.display(), "Serving static files");
        app = app.fallback_service(ServeDir::new(static_dir));
    }

    app.layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Assemble the pipeline and shared state from configuration.
///
/// Everything is built once here and shared via `Arc`; nothing is
/// mutated while requests are being served.
pub fn build_state(config: &AppConfig) -> Result<SharedState, ConfigError> {
    let profile = Arc::new(config.profile_store()?);
    let bank = Arc::new(BankDirectory::new(config.bank.valid_accounts.iter().copied()));
    let actions = Arc::new(bankbot_actions::default_registry(bank.clone()));
    for kind in actions.kinds() {
        if let Some(handler) = actions.get(kind) {
            debug!(action = %kind, description = handler.description(), "Action registered");
        }
    }
    let gateway = Arc::new(WatsonAssistant::from_config(&config.assistant));

    let pipeline = MessagePipeline::new(gateway, profile, actions, config.workspace_id());

    Ok(Arc::new(GatewayState {
        pipeline: Arc::new(pipeline),
        bank,
        expose_engine_errors: config.assistant.expose_engine_errors,
    }))
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let state = build_state(&config)?;
    if !state.pipeline.is_configured() {
        warn!("WORKSPACE_ID is not set; /api/message will return setup instructions");
    }
    if !config.assistant.has_credentials() {
        warn!("No assistant credentials configured; engine calls will be unauthenticated");
    }

    let app = build_app(state, &config.gateway);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    workspace_configured: bool,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        workspace_configured: state.pipeline.is_configured(),
    })
}
