//! Domain events and the notification relay.
//!
//! The host platform client publishes [`DomainEvent`]s onto the [`EventBus`];
//! the [`EventRelay`] consumes them, consults per-tenant configuration, and
//! delivers rendered notification documents to each tenant's webhook. A
//! secondary [`AuditReconciler`] task advances per-tenant audit cursors and
//! offers best-effort actor attribution.

pub mod audit;
pub mod bus;
pub mod delivery;
pub mod event;
pub mod relay;
pub mod render;

pub use audit::{AuditReconciler, Attribution};
pub use bus::EventBus;
pub use delivery::{Deliverer, DeliveryError, SenderIdentity, WebhookDelivery};
pub use event::{DomainEvent, UserRef};
pub use relay::EventRelay;
