//! Configuration loading, validation, and management for the bot.
//!
//! Loads configuration from `~/.gcb/config.toml` with environment variable
//! overrides. Validates all settings at startup. The resulting [`AppConfig`]
//! is built once in `main` and passed down explicitly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the completion service credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// The root configuration structure.
///
/// Maps directly to `~/.gcb/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion service credential, only ever taken from `OPENAI_API_KEY`
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Completion endpoint settings
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Content URI fetch settings
    #[serde(default)]
    pub content: ContentConfig,

    /// Named networks, merged over the built-in ones
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,

    /// Defaults for the path-choice transaction
    #[serde(default)]
    pub transaction: TransactionDefaults,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("completion", &self.completion)
            .field("content", &self.content)
            .field("networks", &self.networks)
            .field("transaction", &self.transaction)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_completion_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_completion_timeout")]
    pub timeout_secs: u64,
}

fn default_completion_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_completion_timeout() -> u64 {
    60
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_completion_url(),
            model: default_model(),
            timeout_secs: default_completion_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default = "default_content_timeout")]
    pub timeout_secs: u64,
}

fn default_content_timeout() -> u64 {
    15
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_content_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint of a node on this network
    pub rpc_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionDefaults {
    /// Keystore account (name or file path) used when `--sender` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,

    /// Directory holding named keystore files (defaults to `~/.gcb/accounts`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keystore_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
}

fn builtin_networks() -> BTreeMap<String, NetworkConfig> {
    BTreeMap::from([
        (
            "development".to_string(),
            NetworkConfig {
                rpc_url: "http://127.0.0.1:8545".into(),
                chain_id: None,
            },
        ),
        (
            "polygon-main".to_string(),
            NetworkConfig {
                rpc_url: "https://polygon-rpc.com".into(),
                chain_id: Some(137),
            },
        ),
    ])
}

impl AppConfig {
    /// Load configuration from `path`, or the default location when `None`.
    ///
    /// Also checks environment variables:
    /// - `OPENAI_API_KEY` (completion credential)
    /// - `GCB_MODEL` (completion model)
    /// - `GCB_COMPLETION_URL` (completion base URL)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let default_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(path.unwrap_or(&default_path))?;
        config.apply_env(|key| std::env::var(key).ok());
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

        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        for (name, network) in builtin_networks() {
            config.networks.entry(name).or_insert(network);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `var`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var(API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(model) = var("GCB_MODEL") {
            self.completion.model = model;
        }
        if let Some(url) = var("GCB_COMPLETION_URL") {
            self.completion.base_url = url;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".gcb")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.completion.timeout_secs == 0 || self.content.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be greater than zero".into(),
            ));
        }

        if !is_http_url(&self.completion.base_url) {
            return Err(ConfigError::ValidationError(format!(
                "completion.base_url must be an http(s) URL, got {}",
                self.completion.base_url
            )));
        }

        if let Some((name, _)) = self
            .networks
            .iter()
            .find(|(_, network)| !is_http_url(&network.rpc_url))
        {
            return Err(ConfigError::ValidationError(format!(
                "network '{name}' must have an http(s) rpc_url"
            )));
        }

        Ok(())
    }

    /// The completion credential; the process must not start without it.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    /// Resolve a network selector: a configured name, or a literal RPC URL.
    pub fn resolve_network(&self, selector: &str) -> Result<NetworkConfig, ConfigError> {
        if is_http_url(selector) {
            return Ok(NetworkConfig {
                rpc_url: selector.to_string(),
                chain_id: None,
            });
        }
        self.networks
            .get(selector)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownNetwork(selector.to_string()))
    }

    pub fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion.timeout_secs)
    }

    pub fn content_timeout(&self) -> Duration {
        Duration::from_secs(self.content.timeout_secs)
    }

    /// Locate the keystore file for a sender account.
    ///
    /// A value naming an existing file, or one that looks like a path, is used
    /// as-is; anything else is an account name under the keystore directory.
    pub fn keystore_path(&self, sender: &str) -> PathBuf {
        let as_path = Path::new(sender);
        if as_path.is_file() || as_path.components().count() > 1 || sender.ends_with(".json") {
            return as_path.to_path_buf();
        }
        self.transaction
            .keystore_dir
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("accounts"))
            .join(format!("{sender}.json"))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            completion: CompletionConfig::default(),
            content: ContentConfig::default(),
            networks: builtin_networks(),
            transaction: TransactionDefaults::default(),
        }
    }
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
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

    #[error("OPENAI_API_KEY environment variable must be set (the key is never read from the config file)")]
    MissingApiKey,

    #[error("Unknown network '{0}' (not configured and not an http(s) URL)")]
    UnknownNetwork(String),
}
