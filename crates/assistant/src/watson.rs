//! Watson Assistant v1 client.
//!
//! Sends one dialog turn per call to
//! `POST {url}/v1/workspaces/{workspace_id}/message?version={version}`
//! with `{input, context}` as the JSON body. Failures are reported with the
//! HTTP status the service returned; nothing is retried.

use async_trait::async_trait;
use bankbot_config::AssistantConfig;
use bankbot_core::assistant::{AssistantGateway, AssistantResponse, MessageRequest, WorkspaceId};
use bankbot_core::error::GatewayError;
use tracing::{debug, warn};

/// How requests authenticate against the service.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// IAM API key, sent as basic auth with the user name `apikey`.
    ApiKey(String),
    /// Legacy service credentials.
    Basic { username: String, password: String },
    /// No credentials (local test doubles).
    None,
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey([REDACTED])"),
            Self::Basic { username, .. } => write!(f, "Basic({username}, [REDACTED])"),
            Self::None => f.write_str("None"),
        }
    }
}

impl Auth {
    /// Pick credentials from config. An API key wins over a user/password pair.
    pub fn from_config(config: &AssistantConfig) -> Self {
        if let Some(key) = &config.apikey {
            return Self::ApiKey(key.clone());
        }
        match (&config.username, &config.password) {
            (Some(username), Some(password)) => Self::Basic {
                username: username.clone(),
                password: password.clone(),
            },
            _ => Self::None,
        }
    }
}

/// A Watson Assistant v1 gateway.
pub struct WatsonAssistant {
    base_url: String,
    version: String,
    auth: Auth,
    client: reqwest::Client,
}

impl WatsonAssistant {
    pub fn new(base_url: impl Into<String>, version: impl Into<String>, auth: Auth) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            version: version.into(),
            auth,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(&config.url, &config.version, Auth::from_config(config))
    }

    fn message_url(&self, workspace_id: &WorkspaceId) -> String {
        format!("{}/v1/workspaces/{}/message", self.base_url, workspace_id)
    }

    /// Turn a non-success reply into a gateway error, keeping the JSON body.
    async fn error_from_response(response: reqwest::Response) -> GatewayError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(body) => {
                let message = body
                    .get("error")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| status.to_string());
                GatewayError::new(Some(status.as_u16()), message).with_body(body)
            }
            Err(_) if text.trim().is_empty() => {
                GatewayError::new(Some(status.as_u16()), status.to_string())
            }
            Err(_) => GatewayError::new(Some(status.as_u16()), text),
        }
    }
}

#[async_trait]
impl AssistantGateway for WatsonAssistant {
    fn name(&self) -> &str {
        "watson"
    }

    async fn message(
        &self,
        request: MessageRequest,
    ) -> std::result::Result<AssistantResponse, GatewayError> {
        let url = self.message_url(&request.workspace_id);
        let body = serde_json::json!({
            "input": request.input,
            "context": request.context,
        });

        debug!(
            workspace = %request.workspace_id,
            context_keys = request.context.len(),
            "Sending message to assistant"
        );

        let mut builder = self
            .client
            .post(&url)
            .query(&[("version", self.version.as_str())])
            .json(&body);

        builder = match &self.auth {
            Auth::ApiKey(key) => builder.basic_auth("apikey", Some(key)),
            Auth::Basic { username, password } => builder.basic_auth(username, Some(password)),
            Auth::None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::transport(format!("Assistant request failed: {e}")))?;

        if !response.status().is_success() {
            let err = Self::error_from_response(response).await;
            warn!(status = err.status(), error = %err.message, "Assistant returned error");
            return Err(err);
        }

        response.json::<AssistantResponse>().await.map_err(|e| {
            GatewayError::transport(format!("Failed to parse assistant response: {e}"))
        })
    }
}
