//! Repository for the `delivery_targets` table.

use hermod_core::types::TenantId;
use sqlx::PgPool;

/// Read/write operations for per-tenant outbound webhook targets.
pub struct DeliveryTargetRepo;

impl DeliveryTargetRepo {
    /// Fetch a tenant's webhook URL. Absence means the relay is disabled
    /// for that tenant.
    pub async fn get(pool: &PgPool, tenant_id: TenantId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT webhook_url FROM delivery_targets WHERE tenant_id = $1")
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Upsert a tenant's webhook URL.
    pub async fn set(
        pool: &PgPool,
        tenant_id: TenantId,
        webhook_url: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO delivery_targets (tenant_id, webhook_url) VALUES ($1, $2) \
             ON CONFLICT (tenant_id) \
             DO UPDATE SET webhook_url = EXCLUDED.webhook_url, updated_at = NOW()",
        )
        .bind(tenant_id)
        .bind(webhook_url)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove a tenant's target. Returns whether a row was deleted.
    pub async fn delete(pool: &PgPool, tenant_id: TenantId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM delivery_targets WHERE tenant_id = $1")
            .bind(tenant_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
