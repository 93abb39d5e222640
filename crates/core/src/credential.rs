//! Tenant provider credentials.
//!
//! A tenant configures at most one upstream provider credential. The secret
//! payload shape depends on the provider: most use a flat API key string,
//! token-refresh providers use a structured grant with an expiry timestamp.
//! Both shapes are ciphertext at rest and decrypted only on read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{TenantId, Timestamp};

/// A structured token grant for providers with refreshable credentials.
///
/// `expires_at` round-trips through the stored ciphertext as RFC 3339 text,
/// so readers always get a real [`DateTime<Utc>`] back, not a raw string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// The secret payload for a provider credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProviderSecret {
    /// A flat API key string.
    Plain(String),
    /// A structured token-refresh grant.
    Structured(TokenGrant),
}

/// A tenant's decrypted credential record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub tenant_id: TenantId,
    pub provider: String,
    pub secret: ProviderSecret,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
