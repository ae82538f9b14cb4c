use std::sync::Mutex;

use async_trait::async_trait;
use bankbot_core::assistant::{AssistantGateway, AssistantResponse, MessageRequest};
use bankbot_core::error::GatewayError;

/// Replays one scripted engine outcome and records every request.
pub struct ScriptedGateway {
    outcome: Result<serde_json::Value, GatewayError>,
    requests: Mutex<Vec<MessageRequest>>,
}

impl ScriptedGateway {
    /// Answer every turn with `raw`, as if the engine had sent it.
    pub fn reply(raw: serde_json::Value) -> Self {
        Self {
            outcome: Ok(raw),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail every turn with `err`.
    pub fn failing(err: GatewayError) -> Self {
        Self {
            outcome: Err(err),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    /// The most recent request, if any turn reached the gateway.
    pub fn last_request(&self) -> Option<MessageRequest> {
        self.requests.lock().ok()?.last().cloned()
    }
}

#[async_trait]
impl AssistantGateway for ScriptedGateway {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn message(&self, request: MessageRequest) -> Result<AssistantResponse, GatewayError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        match &self.outcome {
            Ok(raw) => serde_json::from_value(raw.clone()).map_err(|e| {
                GatewayError::transport(format!("Failed to parse assistant response: {e}"))
            }),
            Err(err) => Err(err.clone()),
        }
    }
}
