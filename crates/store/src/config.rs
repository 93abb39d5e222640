//! Cache-aside tenant config/secret store.
//!
//! Every public operation returns a value, an `Option`, or a `bool` — never
//! a raw store or crypto error. Failures are logged with tenant context and
//! degrade the single call, so one tenant's storage trouble can't
//! destabilize the relay loop or a command handler.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use hermod_core::credential::{CredentialRecord, ProviderSecret, TokenGrant};
use hermod_core::crypto::SecretCipher;
use hermod_core::types::{Namespace, TenantId};
use hermod_db::repositories::{
    CredentialRepo, DeliveryTargetRepo, EventToggleRepo, TenantValueRepo,
};
use hermod_db::DbPool;

use crate::cache::Cache;

/// Cache-aside storage for tenant configuration, toggles, targets, and
/// encrypted credentials.
pub struct ConfigStore {
    pool: DbPool,
    cache: Cache,
    cipher: Arc<SecretCipher>,
}

impl ConfigStore {
    /// Create a store over the given pool, cache, and credential cipher.
    pub fn new(pool: DbPool, cache: Cache, cipher: Arc<SecretCipher>) -> Self {
        Self { pool, cache, cipher }
    }

    // -----------------------------------------------------------------------
    // Cache keys
    // -----------------------------------------------------------------------

    fn value_key(ns: Namespace, tenant_id: TenantId, key: &str) -> String {
        format!("{}:{tenant_id}:{key}", ns.cache_domain())
    }

    fn toggle_key(tenant_id: TenantId, event_key: &str) -> String {
        format!("event_toggle:{tenant_id}:{event_key}")
    }

    fn target_key(tenant_id: TenantId) -> String {
        format!("delivery_target:{tenant_id}")
    }

    fn credential_key(tenant_id: TenantId) -> String {
        format!("tenant_credential:{tenant_id}")
    }

    // -----------------------------------------------------------------------
    // Generic cache-aside read
    // -----------------------------------------------------------------------

    /// The one cache-aside read path every accessor specializes.
    ///
    /// Checks the cache, falls back to `fetch`, and populates the cache on a
    /// store hit. A total miss is returned as `None` without caching the
    /// absence (the default may vary by caller). A store failure is logged
    /// and reported as a miss.
    async fn read_through<F, Fut>(&self, cache_key: &str, fetch: F) -> Option<serde_json::Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<serde_json::Value>, sqlx::Error>>,
    {
        if let Some(value) = self.cache.get(cache_key).await {
            return Some(value);
        }
        match fetch().await {
            Ok(Some(value)) => {
                self.cache.set(cache_key, value.clone()).await;
                Some(value)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::error!(cache_key, error = %e, "Store read failed");
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Tenant key/value namespaces
    // -----------------------------------------------------------------------

    /// Fetch a tenant value, cache-aside.
    pub async fn get(
        &self,
        tenant_id: TenantId,
        ns: Namespace,
        key: &str,
    ) -> Option<serde_json::Value> {
        let cache_key = Self::value_key(ns, tenant_id, key);
        self.read_through(&cache_key, || async {
            TenantValueRepo::get(&self.pool, ns, tenant_id, key).await
        })
        .await
    }

    /// Fetch a tenant value, falling back to a caller-supplied default.
    pub async fn get_or(
        &self,
        tenant_id: TenantId,
        ns: Namespace,
        key: &str,
        default: serde_json::Value,
    ) -> serde_json::Value {
        self.get(tenant_id, ns, key).await.unwrap_or(default)
    }

    /// Upsert a tenant value. The cache is refreshed only after the write
    /// succeeded, so readers never observe a value that failed to persist.
    pub async fn set(
        &self,
        tenant_id: TenantId,
        ns: Namespace,
        key: &str,
        value: serde_json::Value,
    ) -> bool {
        match TenantValueRepo::set(&self.pool, ns, tenant_id, key, &value).await {
            Ok(()) => {
                let cache_key = Self::value_key(ns, tenant_id, key);
                self.cache.set(&cache_key, value).await;
                true
            }
            Err(e) => {
                tracing::error!(
                    tenant_id,
                    namespace = ns.table(),
                    key,
                    error = %e,
                    "Failed to set tenant value"
                );
                false
            }
        }
    }

    /// List every value a tenant has in the namespace.
    ///
    /// Bypasses the cache: administrative listings must not be stale.
    pub async fn get_all(
        &self,
        tenant_id: TenantId,
        ns: Namespace,
    ) -> BTreeMap<String, serde_json::Value> {
        match TenantValueRepo::get_all(&self.pool, ns, tenant_id).await {
            Ok(rows) => rows.into_iter().map(|r| (r.key, r.value)).collect(),
            Err(e) => {
                tracing::error!(
                    tenant_id,
                    namespace = ns.table(),
                    error = %e,
                    "Failed to list tenant values"
                );
                BTreeMap::new()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Event toggles
    // -----------------------------------------------------------------------

    /// Whether an event key is enabled for a tenant. An absent toggle means
    /// `default_enabled`.
    pub async fn event_enabled(
        &self,
        tenant_id: TenantId,
        event_key: &str,
        default_enabled: bool,
    ) -> bool {
        let cache_key = Self::toggle_key(tenant_id, event_key);
        self.read_through(&cache_key, || async {
            let toggle = EventToggleRepo::get(&self.pool, tenant_id, event_key).await?;
            Ok(toggle.map(serde_json::Value::Bool))
        })
        .await
        .and_then(|v| v.as_bool())
        .unwrap_or(default_enabled)
    }

    /// Upsert an event toggle.
    pub async fn set_event_toggle(
        &self,
        tenant_id: TenantId,
        event_key: &str,
        enabled: bool,
    ) -> bool {
        match EventToggleRepo::set(&self.pool, tenant_id, event_key, enabled).await {
            Ok(()) => {
                let cache_key = Self::toggle_key(tenant_id, event_key);
                self.cache.set(&cache_key, serde_json::Value::Bool(enabled)).await;
                true
            }
            Err(e) => {
                tracing::error!(tenant_id, event_key, error = %e, "Failed to set event toggle");
                false
            }
        }
    }

    /// List every toggle a tenant has explicitly set. Bypasses the cache.
    pub async fn all_event_toggles(&self, tenant_id: TenantId) -> BTreeMap<String, bool> {
        match EventToggleRepo::get_all(&self.pool, tenant_id).await {
            Ok(rows) => rows.into_iter().map(|r| (r.event_key, r.enabled)).collect(),
            Err(e) => {
                tracing::error!(tenant_id, error = %e, "Failed to list event toggles");
                BTreeMap::new()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Delivery targets
    // -----------------------------------------------------------------------

    /// Fetch a tenant's webhook URL, cache-aside. Absence means the relay
    /// is disabled for that tenant, not an error.
    pub async fn delivery_target(&self, tenant_id: TenantId) -> Option<String> {
        let cache_key = Self::target_key(tenant_id);
        self.read_through(&cache_key, || async {
            let url = DeliveryTargetRepo::get(&self.pool, tenant_id).await?;
            Ok(url.map(serde_json::Value::String))
        })
        .await
        .and_then(|v| v.as_str().map(str::to_string))
    }

    /// Upsert a tenant's webhook URL.
    pub async fn set_delivery_target(&self, tenant_id: TenantId, webhook_url: &str) -> bool {
        match DeliveryTargetRepo::set(&self.pool, tenant_id, webhook_url).await {
            Ok(()) => {
                let cache_key = Self::target_key(tenant_id);
                self.cache
                    .set(&cache_key, serde_json::Value::String(webhook_url.to_string()))
                    .await;
                true
            }
            Err(e) => {
                tracing::error!(tenant_id, error = %e, "Failed to set delivery target");
                false
            }
        }
    }

    /// Remove a tenant's delivery target, disabling the relay for it.
    pub async fn clear_delivery_target(&self, tenant_id: TenantId) -> bool {
        match DeliveryTargetRepo::delete(&self.pool, tenant_id).await {
            Ok(deleted) => {
                self.cache.delete(&Self::target_key(tenant_id)).await;
                deleted
            }
            Err(e) => {
                tracing::error!(tenant_id, error = %e, "Failed to clear delivery target");
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Provider credentials
    // -----------------------------------------------------------------------

    /// Encrypt and upsert a tenant's provider credential.
    ///
    /// Replaces any prior credential regardless of provider. Reports `false`
    /// on serialization, encryption, or persistence failure — never a
    /// silent success.
    pub async fn set_credential(
        &self,
        tenant_id: TenantId,
        provider: &str,
        secret: &ProviderSecret,
    ) -> bool {
        let (encrypted_secret, encrypted_grant) = match secret {
            ProviderSecret::Plain(value) => match self.cipher.encrypt(value.as_bytes()) {
                Ok(ciphertext) => (Some(ciphertext), None),
                Err(e) => {
                    tracing::error!(tenant_id, provider, error = %e, "Failed to encrypt credential");
                    return false;
                }
            },
            ProviderSecret::Structured(grant) => {
                let json = match serde_json::to_vec(grant) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!(tenant_id, provider, error = %e, "Failed to serialize token grant");
                        return false;
                    }
                };
                match self.cipher.encrypt(&json) {
                    Ok(ciphertext) => (None, Some(ciphertext)),
                    Err(e) => {
                        tracing::error!(tenant_id, provider, error = %e, "Failed to encrypt token grant");
                        return false;
                    }
                }
            }
        };

        match CredentialRepo::set(
            &self.pool,
            tenant_id,
            provider,
            encrypted_secret.as_deref(),
            encrypted_grant.as_deref(),
        )
        .await
        {
            Ok(()) => {
                self.cache.delete(&Self::credential_key(tenant_id)).await;
                true
            }
            Err(e) => {
                tracing::error!(tenant_id, provider, error = %e, "Failed to persist credential");
                false
            }
        }
    }

    /// Fetch and decrypt a tenant's credential, cache-aside.
    ///
    /// A decryption failure (rotated key, corrupted row) is logged and
    /// surfaced as `None`: one tenant's unreadable credential must not
    /// affect any other tenant.
    pub async fn get_credential(&self, tenant_id: TenantId) -> Option<CredentialRecord> {
        let cache_key = Self::credential_key(tenant_id);
        if let Some(cached) = self.cache.get(&cache_key).await {
            if let Ok(record) = serde_json::from_value::<CredentialRecord>(cached) {
                return Some(record);
            }
            // Stale or unreadable cache shape; fall back to the store.
            self.cache.delete(&cache_key).await;
        }

        let row = match CredentialRepo::get(&self.pool, tenant_id).await {
            Ok(Some(row)) => row,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!(tenant_id, error = %e, "Failed to read credential");
                return None;
            }
        };

        let secret = if let Some(ciphertext) = row.encrypted_secret.as_deref() {
            let plaintext = match self.cipher.decrypt(ciphertext) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!(tenant_id, error = %e, "Failed to decrypt credential");
                    return None;
                }
            };
            match String::from_utf8(plaintext) {
                Ok(value) => ProviderSecret::Plain(value),
                Err(e) => {
                    tracing::error!(tenant_id, error = %e, "Credential plaintext is not UTF-8");
                    return None;
                }
            }
        } else if let Some(ciphertext) = row.encrypted_grant.as_deref() {
            let plaintext = match self.cipher.decrypt(ciphertext) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!(tenant_id, error = %e, "Failed to decrypt token grant");
                    return None;
                }
            };
            match serde_json::from_slice::<TokenGrant>(&plaintext) {
                Ok(grant) => ProviderSecret::Structured(grant),
                Err(e) => {
                    tracing::error!(tenant_id, error = %e, "Failed to parse token grant");
                    return None;
                }
            }
        } else {
            tracing::warn!(tenant_id, "Credential row has no secret payload");
            return None;
        };

        let record = CredentialRecord {
            tenant_id: row.tenant_id,
            provider: row.provider,
            secret,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };

        if let Ok(value) = serde_json::to_value(&record) {
            self.cache.set(&cache_key, value).await;
        }
        Some(record)
    }

    /// Remove a tenant's credential. Returns whether a row was deleted.
    pub async fn delete_credential(&self, tenant_id: TenantId) -> bool {
        match CredentialRepo::delete(&self.pool, tenant_id).await {
            Ok(deleted) => {
                self.cache.delete(&Self::credential_key(tenant_id)).await;
                deleted
            }
            Err(e) => {
                tracing::error!(tenant_id, error = %e, "Failed to delete credential");
                false
            }
        }
    }
}
