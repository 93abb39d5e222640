//! Shared building blocks for the hermod tenant notification relay.
//!
//! This crate has no internal dependencies so it can be used by the storage
//! layer, the relay, and any future CLI tooling alike:
//!
//! - [`types`] — tenant/entity id aliases and the [`Namespace`](types::Namespace)
//!   registry for tenant-scoped key/value storage.
//! - [`crypto`] — the process-wide [`SecretCipher`](crypto::SecretCipher)
//!   used for credential encryption at rest.
//! - [`credential`] — the tagged provider-secret variants.
//! - [`document`] — the notification document model with field truncation.
//! - [`event_keys`] — the stable event-key registry for toggles.

pub mod credential;
pub mod crypto;
pub mod document;
pub mod event_keys;
pub mod types;
