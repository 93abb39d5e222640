//! Repository for the tenant key/value namespace tables.
//!
//! All three namespaces share the same `(tenant_id, key) → JSONB` shape, so
//! one repository serves them, parameterized by [`Namespace`].

use hermod_core::types::{Namespace, TenantId};
use sqlx::PgPool;

use crate::models::TenantValueRow;

/// Read/write operations for tenant-scoped key/value rows.
pub struct TenantValueRepo;

impl TenantValueRepo {
    /// Fetch a single value by composite key.
    pub async fn get(
        pool: &PgPool,
        ns: Namespace,
        tenant_id: TenantId,
        key: &str,
    ) -> Result<Option<serde_json::Value>, sqlx::Error> {
        let query = format!(
            "SELECT value FROM {} WHERE tenant_id = $1 AND key = $2",
            ns.table()
        );
        sqlx::query_scalar(&query)
            .bind(tenant_id)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Upsert a value on the `(tenant_id, key)` conflict key.
    pub async fn set(
        pool: &PgPool,
        ns: Namespace,
        tenant_id: TenantId,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (tenant_id, key, value) VALUES ($1, $2, $3) \
             ON CONFLICT (tenant_id, key) \
             DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
            ns.table()
        );
        sqlx::query(&query)
            .bind(tenant_id)
            .bind(key)
            .bind(value)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// List every key/value pair a tenant has in the namespace.
    pub async fn get_all(
        pool: &PgPool,
        ns: Namespace,
        tenant_id: TenantId,
    ) -> Result<Vec<TenantValueRow>, sqlx::Error> {
        let query = format!(
            "SELECT key, value FROM {} WHERE tenant_id = $1 ORDER BY key",
            ns.table()
        );
        sqlx::query_as::<_, TenantValueRow>(&query)
            .bind(tenant_id)
            .fetch_all(pool)
            .await
    }

    /// Count the rows a tenant has in the namespace.
    pub async fn count_for_tenant(
        pool: &PgPool,
        ns: Namespace,
        tenant_id: TenantId,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM {} WHERE tenant_id = $1", ns.table());
        sqlx::query_scalar(&query).bind(tenant_id).fetch_one(pool).await
    }
}
