//! Repository for the `event_toggles` table.

use hermod_core::types::TenantId;
use sqlx::PgPool;

use crate::models::EventToggleRow;

/// Read/write operations for per-tenant event relay toggles.
pub struct EventToggleRepo;

impl EventToggleRepo {
    /// Fetch the stored toggle, if one exists.
    ///
    /// Returns `None` when the tenant never toggled the key; the caller
    /// supplies the default in that case.
    pub async fn get(
        pool: &PgPool,
        tenant_id: TenantId,
        event_key: &str,
    ) -> Result<Option<bool>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT enabled FROM event_toggles WHERE tenant_id = $1 AND event_key = $2",
        )
        .bind(tenant_id)
        .bind(event_key)
        .fetch_optional(pool)
        .await
    }

    /// Upsert a toggle on the `(tenant_id, event_key)` conflict key.
    pub async fn set(
        pool: &PgPool,
        tenant_id: TenantId,
        event_key: &str,
        enabled: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO event_toggles (tenant_id, event_key, enabled) VALUES ($1, $2, $3) \
             ON CONFLICT (tenant_id, event_key) \
             DO UPDATE SET enabled = EXCLUDED.enabled, updated_at = NOW()",
        )
        .bind(tenant_id)
        .bind(event_key)
        .bind(enabled)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// List every toggle a tenant has explicitly set.
    pub async fn get_all(
        pool: &PgPool,
        tenant_id: TenantId,
    ) -> Result<Vec<EventToggleRow>, sqlx::Error> {
        sqlx::query_as::<_, EventToggleRow>(
            "SELECT event_key, enabled FROM event_toggles WHERE tenant_id = $1 ORDER BY event_key",
        )
        .bind(tenant_id)
        .fetch_all(pool)
        .await
    }
}
