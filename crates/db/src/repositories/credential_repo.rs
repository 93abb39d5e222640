//! Repository for the `tenant_credentials` table.
//!
//! The upsert is keyed by `tenant_id` alone: setting a new credential
//! replaces the previous provider's row entirely (single provider per
//! tenant).

use hermod_core::types::TenantId;
use sqlx::PgPool;

use crate::models::CredentialRow;

const CREDENTIAL_COLUMNS: &str = "\
    tenant_id, provider, encrypted_secret, encrypted_grant, created_at, updated_at";

/// Read/write operations for encrypted tenant credentials.
pub struct CredentialRepo;

impl CredentialRepo {
    /// Fetch a tenant's credential row, ciphertext columns included.
    pub async fn get(
        pool: &PgPool,
        tenant_id: TenantId,
    ) -> Result<Option<CredentialRow>, sqlx::Error> {
        let query =
            format!("SELECT {CREDENTIAL_COLUMNS} FROM tenant_credentials WHERE tenant_id = $1");
        sqlx::query_as::<_, CredentialRow>(&query)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Upsert a tenant's credential. Exactly one ciphertext argument should
    /// be `Some`, matching the provider's secret shape.
    pub async fn set(
        pool: &PgPool,
        tenant_id: TenantId,
        provider: &str,
        encrypted_secret: Option<&[u8]>,
        encrypted_grant: Option<&[u8]>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO tenant_credentials (tenant_id, provider, encrypted_secret, encrypted_grant) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (tenant_id) \
             DO UPDATE SET provider = EXCLUDED.provider, \
                           encrypted_secret = EXCLUDED.encrypted_secret, \
                           encrypted_grant = EXCLUDED.encrypted_grant, \
                           updated_at = NOW()",
        )
        .bind(tenant_id)
        .bind(provider)
        .bind(encrypted_secret)
        .bind(encrypted_grant)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove a tenant's credential. Returns whether a row was deleted.
    pub async fn delete(pool: &PgPool, tenant_id: TenantId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tenant_credentials WHERE tenant_id = $1")
            .bind(tenant_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
