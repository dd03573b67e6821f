//! HTTP postback — forwards inbound chat events to the host's HTTP server.

use std::time::Duration;

use async_trait::async_trait;
use chatrelay_core::error::ForwardingError;
use chatrelay_core::event::InboundChatEvent;
use chatrelay_core::postback::Postback;
use tracing::debug;

/// Sends each event as an `application/x-www-form-urlencoded` POST.
pub struct HttpPostback {
    client: reqwest::Client,
}

impl HttpPostback {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to build HTTP client, using defaults");
                reqwest::Client::new()
            });
        Self { client }
    }
}

impl Default for HttpPostback {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

#[async_trait]
impl Postback for HttpPostback {
    async fn deliver(&self, url: &str, event: &InboundChatEvent) -> Result<(), ForwardingError> {
        debug!(url = %url, from = %event.from, to = %event.to, "Posting chat message");

        let response = self
            .client
            .post(url)
            .form(&event.form_fields())
            .send()
            .await
            .map_err(|e| ForwardingError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForwardingError::Status {
                url: url.to_string(),
                status_code: status.as_u16(),
            });
        }

        Ok(())
    }
}

/// Build the postback URL for `path` on the host's HTTP server.
pub fn postback_url(postback_host: &str, port: u16, path: &str) -> String {
    format!("http://{postback_host}:{port}{path}")
}
