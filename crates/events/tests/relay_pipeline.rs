use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hermod_core::crypto::SecretCipher;
use hermod_core::document::NotificationDocument;
use hermod_events::delivery::{Deliverer, DeliveryError, SenderIdentity};
use hermod_events::{DomainEvent, EventBus, EventRelay, UserRef};
use hermod_store::{Cache, ConfigStore};
use sqlx::PgPool;

const TENANT: i64 = 310_500;
const TARGET: &str = "https://hook.example/abc";

/// Records every delivery attempt; a configurable outcome stands in for the
/// remote end.
struct RecordingDeliverer {
    calls: Mutex<Vec<(String, NotificationDocument)>>,
    outcome: fn() -> Result<(), DeliveryError>,
}

impl RecordingDeliverer {
    fn ok() -> Arc<Self> {
        Arc::new(Self { calls: Mutex::new(Vec::new()), outcome: || Ok(()) })
    }

    fn gone() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            outcome: || Err(DeliveryError::TargetGone(404)),
        })
    }

    fn calls(&self) -> Vec<(String, NotificationDocument)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Deliverer for RecordingDeliverer {
    async fn deliver(
        &self,
        url: &str,
        _sender: &SenderIdentity,
        document: &NotificationDocument,
    ) -> Result<(), DeliveryError> {
        self.calls.lock().unwrap().push((url.to_string(), document.clone()));
        (self.outcome)()
    }
}

fn store(pool: PgPool) -> Arc<ConfigStore> {
    let cipher = SecretCipher::from_secret("relay-test-key").unwrap();
    Arc::new(ConfigStore::new(
        pool,
        Cache::new(Duration::from_secs(300)),
        Arc::new(cipher),
    ))
}

fn relay(store: Arc<ConfigStore>, deliverer: Arc<RecordingDeliverer>) -> Arc<EventRelay> {
    let sender = SenderIdentity { username: "Relay".into(), avatar_url: None };
    Arc::new(EventRelay::new(store, deliverer, sender))
}

fn author() -> UserRef {
    UserRef {
        id: 42,
        name: "rin".into(),
        display_name: Some("Rin".into()),
        avatar_url: None,
    }
}

fn message_delete() -> DomainEvent {
    DomainEvent::MessageDeleted {
        tenant_id: TENANT,
        author: author(),
        channel_id: 7,
        channel_name: "general".into(),
        message_id: 900,
        content: "so long".into(),
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn no_delivery_target_means_no_outbound_call(pool: PgPool) {
    let deliverer = RecordingDeliverer::ok();
    let relay = relay(store(pool), Arc::clone(&deliverer));

    relay.process(message_delete()).await;

    assert!(deliverer.calls().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn disabled_key_suppresses_and_reenabling_delivers_exactly_once(pool: PgPool) {
    let store = store(pool);
    let deliverer = RecordingDeliverer::ok();
    let relay = relay(Arc::clone(&store), Arc::clone(&deliverer));

    assert!(store.set_delivery_target(TENANT, TARGET).await);
    assert!(store.set_event_toggle(TENANT, "message_delete", false).await);

    relay.process(message_delete()).await;
    assert!(deliverer.calls().is_empty());

    assert!(store.set_event_toggle(TENANT, "message_delete", true).await);
    relay.process(message_delete()).await;

    let calls = deliverer.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, TARGET);

    let document = &calls[0].1;
    assert!(document.description.contains("Rin (rin) [ID: 42]"));
    assert!(document.description.contains("#general"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn untoggled_key_defaults_to_enabled(pool: PgPool) {
    let store = store(pool);
    let deliverer = RecordingDeliverer::ok();
    let relay = relay(Arc::clone(&store), Arc::clone(&deliverer));

    assert!(store.set_delivery_target(TENANT, TARGET).await);
    relay.process(message_delete()).await;

    assert_eq!(deliverer.calls().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unchanged_edit_is_skipped(pool: PgPool) {
    let store = store(pool);
    let deliverer = RecordingDeliverer::ok();
    let relay = relay(Arc::clone(&store), Arc::clone(&deliverer));

    assert!(store.set_delivery_target(TENANT, TARGET).await);

    relay
        .process(DomainEvent::MessageEdited {
            tenant_id: TENANT,
            author: author(),
            channel_id: 7,
            channel_name: "general".into(),
            message_id: 901,
            before: "same".into(),
            after: "same".into(),
        })
        .await;

    assert!(deliverer.calls().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stale_target_is_not_retried(pool: PgPool) {
    let store = store(pool);
    let deliverer = RecordingDeliverer::gone();
    let relay = relay(Arc::clone(&store), Arc::clone(&deliverer));

    assert!(store.set_delivery_target(TENANT, TARGET).await);
    relay.process(message_delete()).await;

    // One attempt, no backoff loop for a gone target.
    assert_eq!(deliverer.calls().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn run_loop_drains_in_flight_work_on_bus_close(pool: PgPool) {
    let store = store(pool);
    let deliverer = RecordingDeliverer::ok();
    let relay = relay(Arc::clone(&store), Arc::clone(&deliverer));

    assert!(store.set_delivery_target(TENANT, TARGET).await);

    let bus = EventBus::default();
    let receiver = bus.subscribe();
    let handle = tokio::spawn(relay.run(receiver));

    bus.publish(message_delete());
    bus.publish(DomainEvent::MemberBanned { tenant_id: TENANT, user: author() });
    drop(bus);

    handle.await.unwrap();
    assert_eq!(deliverer.calls().len(), 2);
}
