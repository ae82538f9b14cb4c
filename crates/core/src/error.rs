//! Error types for the bankbot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error type.

use thiserror::Error;

/// The top-level error type for bankbot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Assistant engine errors ---
    #[error("Assistant gateway error: {0}")]
    Gateway(#[from] GatewayError),

    // --- Backend action errors ---
    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Status used when the engine failure carries no code of its own.
pub const DEFAULT_GATEWAY_STATUS: u16 = 500;

// --- Bounded context errors ---

/// A failed call to the assistant engine.
///
/// `code` is the HTTP-like status reported by the engine; transport
/// failures have none. `body` keeps the engine's raw JSON error document
/// when one was returned.
#[derive(Debug, Clone, Error)]
#[error("{message} (status: {})", .code.unwrap_or(DEFAULT_GATEWAY_STATUS))]
pub struct GatewayError {
    pub code: Option<u16>,
    pub message: String,
    pub body: Option<serde_json::Value>,
}

impl GatewayError {
    pub fn new(code: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            body: None,
        }
    }

    /// A failure that never reached the engine (DNS, TLS, connection reset).
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// The status to reply with: the engine's code, or 500.
    pub fn status(&self) -> u16 {
        self.code.unwrap_or(DEFAULT_GATEWAY_STATUS)
    }

    /// The JSON document describing this failure to a client.
    ///
    /// With `expose_details` the engine's own body is passed through
    /// (falling back to `{code, error}`); without it only the status and
    /// a fixed message are returned.
    pub fn to_client_body(&self, expose_details: bool) -> serde_json::Value {
        if !expose_details {
            return serde_json::json!({
                "code": self.status(),
                "error": "The assistant service request failed",
            });
        }
        match &self.body {
            Some(body) => body.clone(),
            None => serde_json::json!({
                "code": self.status(),
                "error": self.message,
            }),
        }
    }
}

/// A backend action handler failure.
#[derive(Debug, Clone, Error)]
pub enum ActionError {
    #[error("Invalid action arguments for {action}: {reason}")]
    InvalidArguments { action: String, reason: String },

    #[error("Action execution failed: {action}: {reason}")]
    ExecutionFailed { action: String, reason: String },
}

impl ActionError {
    /// The action name this error belongs to.
    pub fn action(&self) -> &str {
        match self {
            Self::InvalidArguments { action, .. } | Self::ExecutionFailed { action, .. } => action,
        }
    }
}
