//! Configuration loading, validation, and management for ChatRelay.
//!
//! Loads configuration from `~/.chatrelay/config.toml` with environment
//! variable overrides. Host-wide settings are validated at startup; the
//! per-model required fields are checked by the adapter at registration so
//! one bad model does not take down the others.

use chatrelay_core::model::{AdapterConfig, AdapterDefaults, ModelDescriptor};
use chatrelay_core::policy::{ForwardPolicy, ReconnectPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.chatrelay/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Message sent with QUIT when a model is torn down
    #[serde(default = "default_quit_message")]
    pub quit_message: String,

    /// Host process settings (where postbacks go)
    #[serde(default)]
    pub host: HostConfig,

    /// Adapter defaults merged into every model
    #[serde(default)]
    pub defaults: AdapterDefaults,

    /// IRC reconnect policy
    #[serde(default)]
    pub reconnect: ReconnectPolicy,

    /// Postback delivery settings
    #[serde(default)]
    pub forwarding: ForwardingConfig,

    /// Models keyed by identity
    #[serde(default)]
    pub models: BTreeMap<String, AdapterConfig>,
}

fn default_quit_message() -> String {
    "chatrelay shutting down".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Port the host's HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Hostname used to build postback URLs
    #[serde(default = "default_postback_host")]
    pub postback_host: String,
}

fn default_port() -> u16 {
    1337
}
fn default_postback_host() -> String {
    "localhost".into()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            postback_host: default_postback_host(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardingConfig {
    /// Extra attempts after a failed postback (0 = best-effort)
    #[serde(default)]
    pub max_retries: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// HTTP request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_retry_delay_ms() -> u64 {
    500
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            retry_delay_ms: default_retry_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ForwardingConfig {
    pub fn policy(&self) -> ForwardPolicy {
        ForwardPolicy {
            max_retries: self.max_retries,
            retry_delay_ms: self.retry_delay_ms,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.chatrelay/config.toml).
    ///
    /// Environment variables override the file:
    /// - `CHATRELAY_PORT`
    /// - `CHATRELAY_POSTBACK_HOST`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_with_env(&config_path)
    }

    /// Load a specific file, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_overrides(path, |key| std::env::var(key).ok())
    }

    /// Load a specific file and apply overrides from `lookup`. Validation
    /// runs once, on the overridden result.
    pub fn load_with_overrides<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::read_file(path)?;
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Apply overrides from `lookup` (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("CHATRELAY_PORT") {
            self.host.port = port.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("CHATRELAY_PORT is not a valid port: {port}"))
            })?;
        }

        if let Some(host) = lookup("CHATRELAY_POSTBACK_HOST") {
            self.host.postback_host = host;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".chatrelay")
    }

    /// Validate the host-wide settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.port == 0 {
            return Err(ConfigError::ValidationError("host.port must be > 0".into()));
        }

        if self.host.postback_host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "host.postback_host must not be empty".into(),
            ));
        }

        if !self.defaults.postback_url.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "defaults.postback_url must start with '/'".into(),
            ));
        }

        for (identity, model) in &self.models {
            if let Some(url) = &model.postback_url {
                if !url.starts_with('/') {
                    return Err(ConfigError::ValidationError(format!(
                        "models.{identity}.postback_url must start with '/'"
                    )));
                }
            }
        }

        if self.reconnect.initial_delay_ms > self.reconnect.max_delay_ms {
            return Err(ConfigError::ValidationError(
                "reconnect.initial_delay_ms must not exceed reconnect.max_delay_ms".into(),
            ));
        }

        if self.forwarding.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "forwarding.timeout_secs must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// The configured models as host descriptors, ordered by identity.
    pub fn descriptors(&self) -> Vec<ModelDescriptor> {
        self.models
            .iter()
            .map(|(identity, config)| ModelDescriptor::new(identity.clone(), config.clone()))
            .collect()
    }

    /// Generate a starter config TOML string (for `init` command).
    pub fn default_toml() -> String {
        let mut config = Self::default();
        config.models.insert(
            "ircmessage".into(),
            AdapterConfig {
                host: Some("irc.libera.chat".into()),
                nick: Some("chatrelay".into()),
                channel: Some("#sailsjs".into()),
                ..AdapterConfig::default()
            },
        );
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quit_message: default_quit_message(),
            host: HostConfig::default(),
            defaults: AdapterDefaults::default(),
            reconnect: ReconnectPolicy::default(),
            forwarding: ForwardingConfig::default(),
            models: BTreeMap::new(),
        }
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
