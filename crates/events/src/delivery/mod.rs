//! Outbound notification delivery.

use async_trait::async_trait;
use hermod_core::document::NotificationDocument;

pub mod webhook;

pub use webhook::WebhookDelivery;

/// Error type for notification delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The target no longer accepts this sender (revoked, deleted, moved).
    #[error("delivery target is gone (HTTP {0})")]
    TargetGone(u16),

    /// The target is throttling the sender.
    #[error("rate limited by delivery target")]
    RateLimited,

    /// The underlying HTTP request failed (network, DNS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The target returned an unexpected non-2xx status.
    #[error("delivery target returned HTTP {0}")]
    HttpStatus(u16),
}

impl DeliveryError {
    /// Whether a re-attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, DeliveryError::RateLimited | DeliveryError::Request(_))
    }
}

/// The display identity notifications are sent under.
#[derive(Debug, Clone)]
pub struct SenderIdentity {
    pub username: String,
    pub avatar_url: Option<String>,
}

/// Outbound transport boundary for rendered notifications.
///
/// The relay only ever talks to this trait; tests substitute a recording
/// implementation for the HTTP one.
#[async_trait]
pub trait Deliverer: Send + Sync {
    /// Send one document to the target URL. A single attempt; the caller
    /// owns re-attempt policy.
    async fn deliver(
        &self,
        url: &str,
        sender: &SenderIdentity,
        document: &NotificationDocument,
    ) -> Result<(), DeliveryError>;
}
