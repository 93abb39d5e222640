//! In-process TTL cache.
//!
//! Keys are namespaced strings of the form `<domain>:<tenant_id>[:<key>]`;
//! values are the same JSON documents stored canonically in the database.
//! Expired entries are treated as absent and dropped on read. Because the
//! cache lives in-process it cannot become unavailable; a missing entry
//! only costs the caller a store round trip.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

struct CacheEntry {
    value: serde_json::Value,
    expires_at: Instant,
}

/// TTL-expiring key/value cache shared across the config store.
pub struct Cache {
    default_ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl Cache {
    /// Create a cache whose entries expire after `default_ttl`.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a value; expired entries are removed and reported as absent.
    pub async fn get(&self, key: &str) -> Option<serde_json::Value> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }
        // The entry was expired under the read lock, but a concurrent set
        // may have replaced it before we get the write lock. Re-check so a
        // fresh entry is never evicted.
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a value under the default TTL.
    pub async fn set(&self, key: &str, value: serde_json::Value) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    /// Store a value under an explicit TTL.
    pub async fn set_with_ttl(&self, key: &str, value: serde_json::Value, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
    }

    /// Invalidate a key.
    pub async fn delete(&self, key: &str) {
        self.entries.write().await.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.set("tenant_config:1:k", serde_json::json!(42)).await;
        assert_eq!(
            cache.get("tenant_config:1:k").await,
            Some(serde_json::json!(42))
        );
    }

    #[tokio::test]
    async fn missing_key_is_absent() {
        let cache = Cache::new(Duration::from_secs(60));
        assert_eq!(cache.get("tenant_config:1:missing").await, None);
    }

    #[tokio::test]
    async fn expired_entry_is_absent() {
        let cache = Cache::new(Duration::from_secs(60));
        cache
            .set_with_ttl("k", serde_json::json!("v"), Duration::ZERO)
            .await;
        assert_eq!(cache.get("k").await, None);
        // A second read after the expired entry was dropped is still absent.
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn replacing_an_expired_entry_is_not_lost_to_eviction() {
        let cache = Cache::new(Duration::from_secs(60));
        cache
            .set_with_ttl("k", serde_json::json!("stale"), Duration::ZERO)
            .await;
        cache.set("k", serde_json::json!("fresh")).await;
        assert_eq!(cache.get("k").await, Some(serde_json::json!("fresh")));
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.set("k", serde_json::json!(true)).await;
        cache.delete("k").await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn set_overwrites_existing_entry() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.set("k", serde_json::json!(1)).await;
        cache.set("k", serde_json::json!(2)).await;
        assert_eq!(cache.get("k").await, Some(serde_json::json!(2)));
    }
}
