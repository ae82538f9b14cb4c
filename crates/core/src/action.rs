//! Backend actions the dialog asks the bridge to run before replying.
//!
//! The engine embeds an action marker in its output naming a function and
//! its arguments. Names are resolved against a closed set of identifiers
//! ([`ActionKind`]); each identifier maps to one [`ActionHandler`] in the
//! [`ActionRegistry`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ActionError;

/// The backend actions this bridge knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Check an account number against the allow-list.
    ValidateAccount,
    /// Look up the nearest branch.
    LocateBranch,
}

impl ActionKind {
    pub const ALL: [ActionKind; 2] = [ActionKind::ValidateAccount, ActionKind::LocateBranch];

    /// Resolve a marker name. Unknown names return `None`.
    ///
    /// The `bank_*` aliases match the HTTP lookup endpoints.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "validate_account" | "bank_validate" => Some(Self::ValidateAccount),
            "locate_branch" | "bank_locate" => Some(Self::LocateBranch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidateAccount => "validate_account",
            Self::LocateBranch => "locate_branch",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action directive as it appears in the engine's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionMarker {
    pub name: String,

    /// `"client"` or `"server"`; absent means client.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,

    /// Context variable that receives the result tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_variable: Option<String>,
}

impl ActionMarker {
    /// Whether the bridge (rather than the engine) is expected to run it.
    pub fn is_client(&self) -> bool {
        matches!(self.kind.as_deref(), None | Some("client"))
    }

    /// Resolve the marker into a request for a known action.
    pub fn resolve(&self) -> Option<ActionRequest> {
        ActionKind::from_name(&self.name).map(|kind| ActionRequest {
            kind,
            parameters: self.parameters.clone(),
            result_variable: self.result_variable.clone(),
        })
    }
}

/// A resolved request to run one action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub kind: ActionKind,
    pub parameters: serde_json::Map<String, serde_json::Value>,
    pub result_variable: Option<String>,
}

/// The outcome of an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Which action produced this result.
    #[serde(rename = "name")]
    pub kind: ActionKind,

    /// The result tag the dialog keys on (e.g. `"acc123valid"`).
    pub result: String,

    /// Optional structured data for the client to render.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ActionResult {
    pub fn new(kind: ActionKind, result: impl Into<String>) -> Self {
        Self {
            kind,
            result: result.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// The capability every backend action implements.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// The identifier this handler serves.
    fn kind(&self) -> ActionKind;

    /// A description of what this action does.
    fn description(&self) -> &str;

    /// Run the action with the marker's parameters.
    async fn execute(
        &self,
        parameters: &serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<ActionResult, ActionError>;
}

/// Handlers keyed by action identifier.
pub struct ActionRegistry {
    handlers: HashMap<ActionKind, Box<dyn ActionHandler>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler. Replaces any existing handler for the same kind.
    pub fn register(&mut self, handler: Box<dyn ActionHandler>) {
        self.handlers.insert(handler.kind(), handler);
    }

    pub fn get(&self, kind: ActionKind) -> Option<&dyn ActionHandler> {
        self.handlers.get(&kind).map(|h| h.as_ref())
    }

    /// List the registered identifiers.
    pub fn kinds(&self) -> Vec<ActionKind> {
        ActionKind::ALL
            .into_iter()
            .filter(|kind| self.handlers.contains_key(kind))
            .collect()
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
