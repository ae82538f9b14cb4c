//! The per-turn pipeline: merge context, call the engine, dispatch actions.

use std::sync::Arc;

use bankbot_core::action::ActionRegistry;
use bankbot_core::assistant::{
    AssistantGateway, AssistantResponse, MessageInput, MessageRequest, SessionContext, WorkspaceId,
};
use bankbot_core::error::{ActionError, GatewayError};
use bankbot_core::profile::ProfileStore;
use serde::Deserialize;
use tracing::{debug, info};

use crate::context::merge;
use crate::dispatch::ActionDispatcher;

/// Reply sent instead of calling the engine while no workspace is configured.
pub const UNCONFIGURED_MESSAGE: &str = "The app has not been configured with a \
<b>WORKSPACE_ID</b> environment variable. Set it to the ID of the dialog skill \
this server should use (or set <b>assistant.workspace_id</b> in the config file) \
and restart. The banking intents can then be imported into that skill to get a \
working application.";

/// A turn as sent by the web client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientMessage {
    #[serde(default)]
    pub context: Option<SessionContext>,

    #[serde(default)]
    pub input: Option<MessageInput>,
}

/// Why a turn could not produce an engine reply.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Action(#[from] ActionError),
}

pub struct MessagePipeline {
    gateway: Arc<dyn AssistantGateway>,
    profile: Arc<ProfileStore>,
    dispatcher: ActionDispatcher,
    workspace_id: Option<WorkspaceId>,
}

impl MessagePipeline {
    /// Create a pipeline. `workspace_id` of `None` leaves it unconfigured:
    /// every turn gets [`UNCONFIGURED_MESSAGE`] and the engine is never called.
    pub fn new(
        gateway: Arc<dyn AssistantGateway>,
        profile: Arc<ProfileStore>,
        actions: Arc<ActionRegistry>,
        workspace_id: Option<WorkspaceId>,
    ) -> Self {
        Self {
            gateway,
            profile,
            dispatcher: ActionDispatcher::new(actions),
            workspace_id,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.workspace_id.is_some()
    }

    /// Process one client turn.
    pub async fn handle(&self, message: ClientMessage) -> Result<AssistantResponse, PipelineError> {
        let Some(workspace_id) = &self.workspace_id else {
            info!("Workspace not configured, returning setup instructions");
            return Ok(AssistantResponse::notice(UNCONFIGURED_MESSAGE));
        };

        let request = MessageRequest {
            workspace_id: workspace_id.clone(),
            context: merge(message.context.as_ref(), &self.profile),
            input: message.input.unwrap_or_default(),
        };

        debug!(gateway = self.gateway.name(), "Forwarding turn to assistant");
        let response = self.gateway.message(request).await?;

        debug!(lines = response.output_text().len(), "Assistant replied");

        Ok(self.dispatcher.dispatch(response).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankbot_actions::{BankDirectory, default_registry};
    use bankbot_core::profile::ProfileRecord;
    use bankbot_test_utils::ScriptedGateway;
    use serde_json::json;

    fn pipeline(gateway: Arc<ScriptedGateway>, workspace: Option<&str>) -> MessagePipeline {
        let bank = Arc::new(BankDirectory::new([123, 456, 789]));
        MessagePipeline::new(
            gateway,
            Arc::new(ProfileStore::new(ProfileRecord::default()).unwrap()),
            Arc::new(default_registry(bank)),
            WorkspaceId::parse(workspace),
        )
    }

    fn turn(raw: serde_json::Value) -> ClientMessage {
        serde_json::from_value(raw).unwrap()
    }

    #[tokio::test]
    async fn unconfigured_never_calls_gateway() {
        for workspace in [None, Some(""), Some("<workspace-id>")] {
            let gateway = Arc::new(ScriptedGateway::reply(json!({"output": {"text": ["hi"]}})));
            let pipeline = pipeline(gateway.clone(), workspace);
            assert!(!pipeline.is_configured());

            let reply = pipeline
                .handle(turn(json!({"input": {"text": "hello"}})))
                .await
                .unwrap();
            assert_eq!(reply.output_text(), vec![UNCONFIGURED_MESSAGE]);
            assert_eq!(gateway.calls(), 0);
        }
    }

    #[tokio::test]
    async fn forwards_merged_context_and_input() {
        let gateway = Arc::new(ScriptedGateway::reply(json!({"output": {"text": ["Hello Sam"]}})));
        let pipeline = pipeline(gateway.clone(), Some("ws-1"));

        let reply = pipeline
            .handle(turn(json!({
                "context": {"conversation_id": "c-1", "firstName": "Mallory"},
                "input": {"text": "hi there"}
            })))
            .await
            .unwrap();
        assert_eq!(reply.output_text(), vec!["Hello Sam"]);
        assert_eq!(gateway.calls(), 1);

        let request = gateway.last_request().unwrap();
        assert_eq!(request.workspace_id.as_str(), "ws-1");
        assert_eq!(request.input.text.as_deref(), Some("hi there"));
        assert_eq!(request.context.get("conversation_id"), Some(&json!("c-1")));
        assert_eq!(request.context.get("firstName"), Some(&json!("Swami")));
    }

    #[tokio::test]
    async fn empty_body_sends_profile_only() {
        let gateway = Arc::new(ScriptedGateway::reply(json!({"output": {"text": ["Welcome"]}})));
        let pipeline = pipeline(gateway.clone(), Some("ws-1"));

        pipeline.handle(ClientMessage::default()).await.unwrap();
        let request = gateway.last_request().unwrap();
        let profile = ProfileStore::new(ProfileRecord::default()).unwrap();
        assert_eq!(request.context.as_map(), profile.fields());
        assert_eq!(request.input, MessageInput::default());
    }

    #[tokio::test]
    async fn reply_without_action_is_forwarded_unchanged() {
        let engine_reply = json!({
            "output": {"text": ["Hello", 42]},
            "intents": [{"intent": "greeting", "confidence": 1, "source": "classifier"}]
        });
        let gateway = Arc::new(ScriptedGateway::reply(engine_reply.clone()));
        let pipeline = pipeline(gateway, Some("ws-1"));

        let reply = pipeline.handle(ClientMessage::default()).await.unwrap();
        assert_eq!(serde_json::to_value(&reply).unwrap(), engine_reply);
    }

    #[tokio::test]
    async fn action_marker_is_dispatched() {
        let gateway = Arc::new(ScriptedGateway::reply(json!({
            "output": {
                "text": ["Checking account"],
                "action": {"name": "validate_account", "parameters": {"value": 123}}
            }
        })));
        let pipeline = pipeline(gateway, Some("ws-1"));

        let reply = pipeline
            .handle(turn(json!({"input": {"text": "123"}})))
            .await
            .unwrap();
        assert_eq!(reply.as_map()["output"]["action_result"]["result"], "acc123valid");
    }

    #[tokio::test]
    async fn gateway_error_is_propagated() {
        let gateway = Arc::new(ScriptedGateway::failing(
            GatewayError::new(Some(401), "Unauthorized")
                .with_body(json!({"error": "Unauthorized", "code": 401})),
        ));
        let pipeline = pipeline(gateway.clone(), Some("ws-1"));

        let err = pipeline.handle(ClientMessage::default()).await.unwrap_err();
        match err {
            PipelineError::Gateway(e) => assert_eq!(e.status(), 401),
            other => panic!("expected gateway error, got {other:?}"),
        }
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn action_error_is_propagated() {
        let gateway = Arc::new(ScriptedGateway::reply(json!({
            "output": {"action": {"name": "validate_account", "parameters": {}}}
        })));
        let pipeline = pipeline(gateway, Some("ws-1"));

        let err = pipeline.handle(ClientMessage::default()).await.unwrap_err();
        assert!(matches!(err, PipelineError::Action(_)));
    }
}
