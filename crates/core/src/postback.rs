//! Postback trait — where inbound chat events are delivered.

use async_trait::async_trait;

use crate::error::ForwardingError;
use crate::event::InboundChatEvent;

/// Delivers one chat event to an HTTP endpoint.
#[async_trait]
pub trait Postback: Send + Sync {
    /// POST `event` to `url` as form fields `from`, `to`, `message`.
    async fn deliver(&self, url: &str, event: &InboundChatEvent) -> Result<(), ForwardingError>;
}
