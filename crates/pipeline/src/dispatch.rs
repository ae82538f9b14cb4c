//! Action dispatch: run the backend action an engine reply asks for.
//!
//! A reply either carries no action marker (returned untouched), names an
//! action this bridge does not know (also returned untouched), or names a
//! registered action, which is awaited and its result attached to the
//! reply's output.

use std::sync::Arc;

use bankbot_core::action::{ActionRegistry, ActionRequest, ActionResult};
use bankbot_core::assistant::AssistantResponse;
use bankbot_core::error::ActionError;
use tracing::{error, info, warn};

/// Output key the action result is attached under.
pub const ACTION_RESULT_KEY: &str = "action_result";

pub struct ActionDispatcher {
    registry: Arc<ActionRegistry>,
}

impl ActionDispatcher {
    pub fn new(registry: Arc<ActionRegistry>) -> Self {
        Self { registry }
    }

    /// Inspect `response` and run at most one action.
    ///
    /// Returns the response unchanged when there is nothing to run. A
    /// handler failure is returned as the error; it is never retried.
    pub async fn dispatch(
        &self,
        mut response: AssistantResponse,
    ) -> Result<AssistantResponse, ActionError> {
        let Some(marker) = response.action_marker() else {
            return Ok(response);
        };

        let Some(request) = marker.resolve() else {
            warn!(action = %marker.name, "Unknown action requested, replying without it");
            return Ok(response);
        };

        let Some(handler) = self.registry.get(request.kind) else {
            warn!(action = %request.kind, "No handler registered, replying without it");
            return Ok(response);
        };

        info!(action = %request.kind, "Dispatching action");
        let result = handler
            .execute(&request.parameters)
            .await
            .inspect_err(|e| error!(action = %request.kind, error = %e, "Action failed"))?;

        apply_result(&mut response, &request, result);
        Ok(response)
    }
}

/// Attach `result` to the reply: under `output.action_result`, and in the
/// context variable the marker named, if any.
fn apply_result(response: &mut AssistantResponse, request: &ActionRequest, result: ActionResult) {
    if let Some(variable) = &request.result_variable {
        response.context_mut().insert(
            variable.clone(),
            serde_json::Value::String(result.result.clone()),
        );
    }

    let mut attached = serde_json::Map::new();
    attached.insert("name".into(), result.kind.as_str().into());
    attached.insert("result".into(), result.result.into());
    if let Some(data) = result.data {
        attached.insert("data".into(), data);
    }
    response
        .output_mut()
        .insert(ACTION_RESULT_KEY.into(), serde_json::Value::Object(attached));
}
