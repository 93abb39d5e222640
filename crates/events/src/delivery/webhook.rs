//! Webhook delivery over HTTP.
//!
//! [`WebhookDelivery`] POSTs a JSON-encoded notification document to a
//! tenant-configured URL. Mention resolution is always suppressed: whatever
//! the document contains, a relayed notification must never ping anyone.

use std::time::Duration;

use async_trait::async_trait;
use hermod_core::document::NotificationDocument;

use super::{Deliverer, DeliveryError, SenderIdentity};

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers rendered notifications to tenant webhook endpoints.
///
/// Holds one [`reqwest::Client`] built at startup and shared by every
/// attempt; dropping the delivery releases the client's connection pool.
pub struct WebhookDelivery {
    client: reqwest::Client,
}

impl WebhookDelivery {
    /// Create a new delivery service with a pre-configured HTTP client.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client }
    }

    fn payload(sender: &SenderIdentity, document: &NotificationDocument) -> serde_json::Value {
        serde_json::json!({
            "username": sender.username,
            "avatar_url": sender.avatar_url,
            "allowed_mentions": { "parse": [] },
            "embeds": [{
                "title": document.title,
                "description": document.description,
                "color": document.color,
                "author": document.author.as_ref().map(|a| serde_json::json!({
                    "name": a.name,
                    "icon_url": a.avatar_url,
                })),
                "fields": document.fields.iter().map(|f| serde_json::json!({
                    "name": f.name,
                    "value": f.value,
                    "inline": f.inline,
                })).collect::<Vec<_>>(),
                "footer": { "text": document.footer },
                "timestamp": document.timestamp,
            }],
        })
    }
}

#[async_trait]
impl Deliverer for WebhookDelivery {
    async fn deliver(
        &self,
        url: &str,
        sender: &SenderIdentity,
        document: &NotificationDocument,
    ) -> Result<(), DeliveryError> {
        let payload = Self::payload(sender, document);
        let response = self.client.post(url).json(&payload).send().await?;

        let status = response.status();
        match status.as_u16() {
            _ if status.is_success() => Ok(()),
            401 | 403 | 404 => Err(DeliveryError::TargetGone(status.as_u16())),
            429 => Err(DeliveryError::RateLimited),
            other => Err(DeliveryError::HttpStatus(other)),
        }
    }
}

impl Default for WebhookDelivery {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use hermod_core::document::{colors, NotificationDocument};

    use super::*;

    #[test]
    fn new_does_not_panic() {
        let _delivery = WebhookDelivery::new();
    }

    #[test]
    fn payload_suppresses_mentions_and_carries_sender() {
        let sender = SenderIdentity {
            username: "Relay".into(),
            avatar_url: Some("https://cdn.example/relay.png".into()),
        };
        let mut document = NotificationDocument::new("Message Deleted", "gone", colors::DARK_GREY);
        document.push_footer("Message ID: 1");

        let payload = WebhookDelivery::payload(&sender, &document);
        assert_eq!(payload["allowed_mentions"]["parse"], serde_json::json!([]));
        assert_eq!(payload["username"], "Relay");
        assert_eq!(payload["embeds"][0]["title"], "Message Deleted");
        assert_eq!(payload["embeds"][0]["footer"]["text"], "Message ID: 1");
    }
}
