//! Assistant gateway trait and the wire types of a dialog turn.
//!
//! The engine maps input text plus conversational context to detected
//! intents and output directives. The bridge treats it as an opaque
//! request/response service: one `message` call per client turn.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::action::ActionMarker;
use crate::error::GatewayError;

/// Per-request conversational state supplied by the client.
pub type SessionContext = serde_json::Map<String, serde_json::Value>;

/// Placeholder left in sample configs when no workspace was provisioned.
pub const WORKSPACE_PLACEHOLDER: &str = "<workspace-id>";

/// Identifies the dialog skill (workspace) the engine should run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(String);

impl WorkspaceId {
    /// Accept a configured identifier. Unset, blank, and placeholder
    /// values yield `None`.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let raw = raw?.trim();
        if raw.is_empty() || raw == WORKSPACE_PLACEHOLDER {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session context with the profile overlaid. Built once per request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergedContext(serde_json::Map<String, serde_json::Value>);

impl MergedContext {
    pub fn from_map(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The user's utterance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Any other input fields the client sent, forwarded untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MessageInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            extra: serde_json::Map::new(),
        }
    }
}

/// A single call to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageRequest {
    pub workspace_id: WorkspaceId,
    pub context: MergedContext,
    pub input: MessageInput,
}

/// The engine's reply, kept as the raw JSON object it arrived as.
///
/// Nothing is normalized on the way through: a reply with no action
/// marker reaches the client with the same fields and values the engine
/// produced. The dispatcher edits only `output` and `context`, and only
/// when it runs an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssistantResponse(serde_json::Map<String, serde_json::Value>);

impl AssistantResponse {
    /// A reply that only carries text, produced locally rather than by the engine.
    pub fn notice(text: impl Into<String>) -> Self {
        let mut output = serde_json::Map::new();
        output.insert("text".into(), serde_json::json!([text.into()]));
        let mut map = serde_json::Map::new();
        map.insert("output".into(), serde_json::Value::Object(output));
        Self(map)
    }

    pub fn as_map(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.0
    }

    /// Response lines in `output.text`. The engine sends a list; a bare
    /// string counts as one line and non-string entries are skipped.
    pub fn output_text(&self) -> Vec<&str> {
        match self.0.get("output").and_then(|output| output.get("text")) {
            Some(serde_json::Value::String(line)) => vec![line.as_str()],
            Some(serde_json::Value::Array(lines)) => {
                lines.iter().filter_map(serde_json::Value::as_str).collect()
            }
            _ => Vec::new(),
        }
    }

    /// The action directive in `output`, if any.
    ///
    /// `action` (a single object) takes precedence; otherwise the first
    /// client-side entry of the `actions` list is used. Malformed entries
    /// are ignored.
    pub fn action_marker(&self) -> Option<ActionMarker> {
        let output = self.0.get("output")?;
        if let Some(marker) = output
            .get("action")
            .and_then(|value| ActionMarker::deserialize(value).ok())
        {
            return Some(marker);
        }

        output
            .get("actions")
            .and_then(serde_json::Value::as_array)?
            .iter()
            .filter_map(|value| ActionMarker::deserialize(value).ok())
            .find(ActionMarker::is_client)
    }

    /// The `output` object, created if the engine sent none.
    pub fn output_mut(&mut self) -> &mut serde_json::Map<String, serde_json::Value> {
        object_entry(&mut self.0, "output")
    }

    /// The `context` object, created if the engine sent none.
    pub fn context_mut(&mut self) -> &mut serde_json::Map<String, serde_json::Value> {
        object_entry(&mut self.0, "context")
    }
}

/// The object stored under `key`; a missing or non-object value is
/// replaced by an empty object.
fn object_entry<'a>(
    map: &'a mut serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> &'a mut serde_json::Map<String, serde_json::Value> {
    let slot = map
        .entry(key)
        .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
    if !slot.is_object() {
        *slot = serde_json::Value::Object(serde_json::Map::new());
    }
    match slot {
        serde_json::Value::Object(object) => object,
        _ => unreachable!("slot holds an object"),
    }
}

/// The assistant engine contract.
///
/// The production implementation calls the hosted engine over HTTP;
/// tests substitute scripted gateways.
#[async_trait]
pub trait AssistantGateway: Send + Sync {
    /// A human-readable name for this gateway (e.g., "watson").
    fn name(&self) -> &str;

    /// Send one turn to the engine.
    async fn message(
        &self,
        request: MessageRequest,
    ) -> std::result::Result<AssistantResponse, GatewayError>;
}
