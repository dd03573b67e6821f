//! Model descriptors and per-model adapter configuration.
//!
//! The host hands the adapter one `ModelDescriptor` per registered model.
//! Its config may be partially populated; the adapter fills in defaults and
//! validates the required fields before anything touches the network.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::transport::ConnectionSettings;

/// Postback path used when a model does not name one.
pub const DEFAULT_POSTBACK_URL: &str = "/chat";

/// Per-model IRC adapter configuration, as supplied by the host.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// IRC server address (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// IRC nickname (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,

    /// IRC channel to join, e.g. `#sailsjs` (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    /// Local HTTP path that receives forwarded messages
    #[serde(
        default,
        alias = "postbackURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub postback_url: Option<String>,

    /// IRC server port; the client library picks one when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Connect over TLS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_tls: Option<bool>,

    /// IRC server password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Host-specific keys this adapter does not interpret
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl std::fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("host", &self.host)
            .field("nick", &self.nick)
            .field("channel", &self.channel)
            .field("postback_url", &self.postback_url)
            .field("port", &self.port)
            .field("use_tls", &self.use_tls)
            .field(
                "password",
                &self.password.as_ref().map(|_| "[REDACTED]"),
            )
            .field("extra", &self.extra)
            .finish()
    }
}

/// Returns the value when it is present and not blank.
fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl AdapterConfig {
    /// Fill in every field the adapter defaults cover, leaving explicit
    /// values untouched.
    pub fn absorb_defaults(&mut self, defaults: &AdapterDefaults) {
        if self.postback_url.is_none() {
            self.postback_url = Some(defaults.postback_url.clone());
        }
    }

    /// Check the required fields in the order channel, nick, host and
    /// stop at the first one missing.
    pub fn validate(&self) -> Result<ConnectionSettings, ConfigurationError> {
        let channel = present(&self.channel).ok_or(ConfigurationError::MissingChannel)?;
        let nick = present(&self.nick).ok_or(ConfigurationError::MissingNick)?;
        let host = present(&self.host).ok_or(ConfigurationError::MissingHost)?;

        Ok(ConnectionSettings {
            host: host.to_string(),
            port: self.port,
            use_tls: self.use_tls.unwrap_or(false),
            nick: nick.to_string(),
            password: self.password.clone(),
            channel: channel.to_string(),
        })
    }

    /// The postback path, falling back to `/chat`.
    pub fn postback_path(&self) -> &str {
        self.postback_url.as_deref().unwrap_or(DEFAULT_POSTBACK_URL)
    }
}

/// Process-wide defaults absorbed into every model's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterDefaults {
    #[serde(default = "default_postback_url", alias = "postbackURL")]
    pub postback_url: String,
}

fn default_postback_url() -> String {
    DEFAULT_POSTBACK_URL.into()
}

impl Default for AdapterDefaults {
    fn default() -> Self {
        Self {
            postback_url: default_postback_url(),
        }
    }
}

/// What the host passes to `register_collection`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Unique model identity, used as the registry key
    pub identity: String,

    #[serde(default)]
    pub config: AdapterConfig,
}

impl ModelDescriptor {
    pub fn new(identity: impl Into<String>, config: AdapterConfig) -> Self {
        Self {
            identity: identity.into(),
            config,
        }
    }
}
