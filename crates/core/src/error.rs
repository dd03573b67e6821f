//! Error types for the ChatRelay domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context (configuration, IRC transport, HTTP forwarding)
//! has its own error type; `AdapterError` is what the host lifecycle sees.

use thiserror::Error;

/// The error returned from adapter lifecycle operations.
#[derive(Debug, Error)]
pub enum AdapterError {
    // --- Configuration errors ---
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    // --- Transport errors ---
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Result type alias using our AdapterError.
pub type Result<T> = std::result::Result<T, AdapterError>;

// --- Bounded context errors ---

/// A required per-model setting is missing or empty.
///
/// The messages are what the host sees at lift time, so they carry an
/// example value for the missing field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("No channel specified (e.g. #sailsjs)")]
    MissingChannel,

    #[error("No nick specified (e.g. mikermcneil)")]
    MissingNick,

    #[error("No host specified (e.g. zelazny.freenode.net)")]
    MissingHost,
}

impl ConfigurationError {
    /// Name of the offending configuration field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingChannel => "channel",
            Self::MissingNick => "nick",
            Self::MissingHost => "host",
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Failed to connect to {host}: {reason}")]
    Connect { host: String, reason: String },

    #[error("IRC stream error: {0}")]
    Stream(String),

    #[error("IRC connection closed: {0}")]
    Closed(String),
}

#[derive(Debug, Clone, Error)]
pub enum ForwardingError {
    #[error("Postback request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("Postback to {url} rejected with status {status_code}")]
    Status { url: String, status_code: u16 },
}
