//! Configuration loading, validation, and management for bankbot.
//!
//! Loads configuration from `~/.bankbot/config.toml` with environment
//! variable overrides. Validates all settings at startup; the result is
//! treated as immutable for the lifetime of the process.

use bankbot_core::assistant::WorkspaceId;
use bankbot_core::profile::{FunctionCredentials, ProfileRecord, ProfileStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variables read at startup.
pub mod env {
    pub const WORKSPACE_ID: &str = "WORKSPACE_ID";
    pub const ASSISTANT_URL: &str = "ASSISTANT_URL";
    pub const ASSISTANT_APIKEY: &str = "ASSISTANT_APIKEY";
    pub const ASSISTANT_IAM_APIKEY: &str = "ASSISTANT_IAM_APIKEY";
    pub const ASSISTANT_USERNAME: &str = "ASSISTANT_USERNAME";
    pub const ASSISTANT_PASSWORD: &str = "ASSISTANT_PASSWORD";
    pub const CLOUD_FUNCTION_USER: &str = "CLOUD_FUNCTION_USER";
    pub const CLOUD_FUNCTION_PASS: &str = "CLOUD_FUNCTION_PASS";
    pub const PORT: &str = "PORT";
}

/// The root configuration structure.
///
/// Maps directly to `~/.bankbot/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Assistant engine connection
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// HTTP gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Credentials handed to the engine for backend functions
    #[serde(default)]
    pub functions: FunctionsConfig,

    /// Stand-in banking back end
    #[serde(default)]
    pub bank: BankConfig,

    /// Simulated user profile merged into every request
    #[serde(default)]
    pub profile: ProfileRecord,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Service base URL (without `/v1`)
    #[serde(default = "default_assistant_url")]
    pub url: String,

    /// API version date sent as `?version=`
    #[serde(default = "default_api_version")]
    pub version: String,

    /// Dialog skill to run. Unset or `<workspace-id>` leaves the bridge unconfigured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,

    /// IAM API key (sent as basic auth user `apikey`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apikey: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Return the engine's error body verbatim on failures.
    #[serde(default = "default_true")]
    pub expose_engine_errors: bool,
}

fn default_assistant_url() -> String {
    "https://gateway.watsonplatform.net/assistant/api".into()
}
fn default_api_version() -> String {
    "2018-07-10".into()
}
fn default_true() -> bool {
    true
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            url: default_assistant_url(),
            version: default_api_version(),
            workspace_id: None,
            apikey: None,
            username: None,
            password: None,
            expose_engine_errors: true,
        }
    }
}

impl std::fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("url", &self.url)
            .field("version", &self.version)
            .field("workspace_id", &self.workspace_id)
            .field("apikey", &redact(&self.apikey))
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("expose_engine_errors", &self.expose_engine_errors)
            .finish()
    }
}

impl AssistantConfig {
    /// Whether some form of engine credentials is present.
    pub fn has_credentials(&self) -> bool {
        self.apikey.is_some() || (self.username.is_some() && self.password.is_some())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Directory served for paths no route matches (the web UI)
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_static_dir() -> String {
    "public".into()
}
fn default_max_body_bytes() -> usize {
    1024 * 1024
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            static_dir: default_static_dir(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct FunctionsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl std::fmt::Debug for FunctionsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionsConfig")
            .field("user", &self.user)
            .field("password", &redact(&self.password))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankConfig {
    /// Account numbers that validate successfully
    #[serde(default = "default_valid_accounts")]
    pub valid_accounts: Vec<i64>,
}

fn default_valid_accounts() -> Vec<i64> {
    vec![123, 456, 789]
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            valid_accounts: default_valid_accounts(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.bankbot/config.toml),
    /// then apply environment overrides:
    /// - `WORKSPACE_ID`
    /// - `ASSISTANT_URL`, `ASSISTANT_APIKEY` / `ASSISTANT_IAM_APIKEY`
    /// - `ASSISTANT_USERNAME`, `ASSISTANT_PASSWORD`
    /// - `CLOUD_FUNCTION_USER`, `CLOUD_FUNCTION_PASS`
    /// - `PORT`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(&Self::config_dir().join("config.toml"))
    }

    /// Load from a specific path, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup. Set variables win over
    /// file values; blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(workspace) = var(env::WORKSPACE_ID) {
            self.assistant.workspace_id = Some(workspace);
        }
        if let Some(url) = var(env::ASSISTANT_URL) {
            self.assistant.url = url;
        }
        if let Some(apikey) = var(env::ASSISTANT_APIKEY).or_else(|| var(env::ASSISTANT_IAM_APIKEY)) {
            self.assistant.apikey = Some(apikey);
        }
        if let Some(username) = var(env::ASSISTANT_USERNAME) {
            self.assistant.username = Some(username);
        }
        if let Some(password) = var(env::ASSISTANT_PASSWORD) {
            self.assistant.password = Some(password);
        }
        if let Some(user) = var(env::CLOUD_FUNCTION_USER) {
            self.functions.user = Some(user);
        }
        if let Some(password) = var(env::CLOUD_FUNCTION_PASS) {
            self.functions.password = Some(password);
        }
        if let Some(port) = var(env::PORT) {
            self.gateway.port = port.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("{} must be a port number, got '{port}'", env::PORT))
            })?;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".bankbot")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.assistant.url.starts_with("http://") || self.assistant.url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "assistant.url must be an http(s) URL, got '{}'",
                self.assistant.url
            )));
        }

        if self.assistant.version.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "assistant.version must not be empty".into(),
            ));
        }

        if self.gateway.max_body_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.max_body_bytes must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// The configured workspace, or `None` while it is unset or a placeholder.
    pub fn workspace_id(&self) -> Option<WorkspaceId> {
        WorkspaceId::parse(self.assistant.workspace_id.as_deref())
    }

    /// Build the profile store injected into the message pipeline, with the
    /// function credentials folded into the profile's private section.
    pub fn profile_store(&self) -> Result<ProfileStore, ConfigError> {
        let mut record = self.profile.clone();
        let existing = &self.profile.private.function_creds;
        record.private.function_creds = FunctionCredentials {
            user: self.functions.user.clone().or_else(|| existing.user.clone()),
            password: self.functions.password.clone().or_else(|| existing.password.clone()),
        };
        ProfileStore::new(record).map_err(|e| ConfigError::ValidationError(format!("profile: {e}")))
    }

    /// Generate a default config TOML string (for `config init`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// The effective config as TOML with secrets removed (for `config show`).
    pub fn redacted_toml(&self) -> String {
        let mut config = self.clone();
        for secret in [
            &mut config.assistant.apikey,
            &mut config.assistant.password,
            &mut config.functions.password,
            &mut config.profile.private.function_creds.password,
        ] {
            if secret.is_some() {
                *secret = Some("[REDACTED]".into());
            }
        }
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
