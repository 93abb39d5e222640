//! The notification relay pipeline.
//!
//! [`EventRelay`] subscribes to the event bus and, for every received
//! [`DomainEvent`], runs the per-event pipeline: delivery-target lookup,
//! toggle check, render, deliver. Each event is processed as an independent
//! task so a slow webhook never stalls other tenants. Nothing in the
//! pipeline can raise into the platform's dispatch path.

use std::sync::Arc;
use std::time::Duration;

use hermod_core::document::NotificationDocument;
use hermod_core::types::TenantId;
use hermod_store::ConfigStore;
use tokio::sync::broadcast;
use tokio_util::task::TaskTracker;

use crate::delivery::{Deliverer, DeliveryError, SenderIdentity};
use crate::event::DomainEvent;
use crate::render::render;

/// Backoff before each transient-failure re-attempt. After the last delay
/// one final attempt is made, then the notification is dropped; there is no
/// durable retry queue.
const RETRY_DELAYS_SECS: [u64; 2] = [1, 2];

/// Consumes domain events and relays them to tenant webhooks.
pub struct EventRelay {
    store: Arc<ConfigStore>,
    deliverer: Arc<dyn Deliverer>,
    sender: SenderIdentity,
}

impl EventRelay {
    pub fn new(store: Arc<ConfigStore>, deliverer: Arc<dyn Deliverer>, sender: SenderIdentity) -> Self {
        Self { store, deliverer, sender }
    }

    /// Run the relay loop.
    ///
    /// Each received event is spawned as its own task. The loop exits when
    /// the bus is dropped and then waits for in-flight deliveries to finish
    /// or fail naturally; in-flight work is never cancelled.
    pub async fn run(self: Arc<Self>, mut receiver: broadcast::Receiver<DomainEvent>) {
        let tracker = TaskTracker::new();

        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let relay = Arc::clone(&self);
                    tracker.spawn(async move {
                        relay.process(event).await;
                    });
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Relay lagged, some events were not delivered");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, relay shutting down");
                    break;
                }
            }
        }

        tracker.close();
        tracker.wait().await;
    }

    /// Run the pipeline for a single event.
    ///
    /// A tenant with no delivery target has opted out; that is a silent
    /// no-op, not an error. An absent toggle row means enabled.
    pub async fn process(&self, event: DomainEvent) {
        let tenant_id = event.tenant_id();
        let event_key = event.event_key();

        let Some(url) = self.store.delivery_target(tenant_id).await else {
            return;
        };
        if !self.store.event_enabled(tenant_id, event_key, true).await {
            return;
        }
        if let DomainEvent::MessageEdited { before, after, .. } = &event {
            // Embed-only updates fire edit events with identical text.
            if before == after {
                return;
            }
        }

        let document = render(&event);
        deliver_with_retry(
            self.deliverer.as_ref(),
            &self.sender,
            &url,
            tenant_id,
            event_key,
            &document,
        )
        .await;
    }
}

/// Deliver one document, classifying failures.
///
/// Stale targets (authorization/not-found) and unexpected statuses are
/// logged and skipped. Transient failures get bounded in-process
/// re-attempts before the notification is dropped.
async fn deliver_with_retry(
    deliverer: &dyn Deliverer,
    sender: &SenderIdentity,
    url: &str,
    tenant_id: TenantId,
    event_key: &str,
    document: &NotificationDocument,
) {
    let mut attempt = 0usize;
    loop {
        match deliverer.deliver(url, sender, document).await {
            Ok(()) => return,
            Err(DeliveryError::TargetGone(status)) => {
                tracing::warn!(
                    tenant_id,
                    event_key,
                    status,
                    "Delivery target is gone, skipping notification"
                );
                return;
            }
            Err(e) if e.is_transient() && attempt < RETRY_DELAYS_SECS.len() => {
                tracing::warn!(
                    tenant_id,
                    event_key,
                    attempt = attempt + 1,
                    error = %e,
                    "Transient delivery failure, retrying"
                );
                tokio::time::sleep(Duration::from_secs(RETRY_DELAYS_SECS[attempt])).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(
                    tenant_id,
                    event_key,
                    error = %e,
                    "Notification delivery failed, dropping"
                );
                return;
            }
        }
    }
}
