//! Events delivered by an IRC connection to its relay.

use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// A chat line received on an IRC connection.
///
/// Transient: forwarded to the postback endpoint and then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundChatEvent {
    /// Nickname of the sender
    pub from: String,

    /// Target the message was sent to (channel name or our nick)
    pub to: String,

    /// The message text
    pub message: String,
}

impl InboundChatEvent {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            message: message.into(),
        }
    }

    /// Form fields for the postback body, in wire order.
    pub fn form_fields(&self) -> [(&'static str, &str); 3] {
        [
            ("from", self.from.as_str()),
            ("to", self.to.as_str()),
            ("message", self.message.as_str()),
        ]
    }
}

/// Everything a connection can report, in the order it happened.
#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    /// An inbound chat message
    Message(InboundChatEvent),

    /// A transport-level failure; the connection may or may not recover
    Error(TransportError),

    /// The connection task has ended and no more events will follow
    Closed,
}
