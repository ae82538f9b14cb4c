//! Conversation endpoint.
//!
//! - `POST /api/message` — run one turn through the message pipeline

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};

use bankbot_core::error::{ActionError, GatewayError};
use bankbot_pipeline::{ClientMessage, PipelineError};

use crate::SharedState;

type ApiError = (StatusCode, Json<serde_json::Value>);

pub fn api_router() -> Router<SharedState> {
    Router::new().route("/api/message", post(message_handler))
}

/// Sent in place of the reply when a backend action fails.
#[derive(Serialize)]
struct ActionErrorBody<'a> {
    error: String,
    action: &'a str,
}

async fn message_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let message = parse_message(&body)?;
    info!(
        has_context = message.context.is_some(),
        has_input = message.input.is_some(),
        "Message received"
    );

    match state.pipeline.handle(message).await {
        Ok(response) => Ok(Json(response).into_response()),
        Err(PipelineError::Gateway(err)) => Err(gateway_error(&err, state.expose_engine_errors)),
        Err(PipelineError::Action(err)) => Ok(action_error(&err)),
    }
}

/// An empty body is an empty turn.
fn parse_message(body: &[u8]) -> Result<ClientMessage, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ClientMessage::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": format!("Invalid request body: {e}") })),
        )
    })
}

fn gateway_error(err: &GatewayError, expose: bool) -> ApiError {
    let status =
        StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    warn!(status = status.as_u16(), error = %err.message, "Assistant call failed");
    (status, Json(err.to_client_body(expose)))
}

/// Reported with 200; the payload stands in for the dialog reply.
fn action_error(err: &ActionError) -> Response {
    Json(ActionErrorBody {
        error: err.to_string(),
        action: err.action(),
    })
    .into_response()
}
