//! Cache-aside tenant configuration and secret storage.
//!
//! - [`Cache`] — in-process TTL cache; a disposable accelerator, never the
//!   source of truth.
//! - [`ConfigStore`] — the cache-aside read/write surface over the tenant
//!   namespaces, event toggles, delivery targets, and encrypted provider
//!   credentials. Owns error containment: no store or crypto error crosses
//!   this boundary.

pub mod cache;
pub mod config;

pub use cache::Cache;
pub use config::ConfigStore;
