//! Row models for the tenant storage tables.

use hermod_core::types::{TenantId, Timestamp};
use sqlx::FromRow;

/// A row from one of the tenant key/value namespace tables.
#[derive(Debug, Clone, FromRow)]
pub struct TenantValueRow {
    pub key: String,
    pub value: serde_json::Value,
}

/// A row from the `event_toggles` table.
#[derive(Debug, Clone, FromRow)]
pub struct EventToggleRow {
    pub event_key: String,
    pub enabled: bool,
}

/// A row from the `tenant_credentials` table. Secret columns are ciphertext.
#[derive(Debug, Clone, FromRow)]
pub struct CredentialRow {
    pub tenant_id: TenantId,
    pub provider: String,
    pub encrypted_secret: Option<Vec<u8>>,
    pub encrypted_grant: Option<Vec<u8>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
