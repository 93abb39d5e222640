//! Core id and timestamp aliases.

/// Tenant identifiers are 64-bit integers assigned by the host platform.
pub type TenantId = i64;

/// User identifiers share the platform's 64-bit id space.
pub type UserId = i64;

/// Channel identifiers share the platform's 64-bit id space.
pub type ChannelId = i64;

/// Message identifiers share the platform's 64-bit id space.
pub type MessageId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Logical grouping of tenant-scoped key/value configuration.
///
/// Each namespace is backed by its own table but shares the same
/// `(tenant_id, key) → JSONB value` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// General tenant configuration.
    Config,
    /// Feature settings (prefixes, relay options, ...).
    Setting,
    /// Detection-tuning parameters.
    Detection,
}

impl Namespace {
    /// The backing table for this namespace.
    pub fn table(self) -> &'static str {
        match self {
            Namespace::Config => "tenant_config",
            Namespace::Setting => "tenant_settings",
            Namespace::Detection => "detection_config",
        }
    }

    /// The cache-key domain prefix for this namespace.
    pub fn cache_domain(self) -> &'static str {
        match self {
            Namespace::Config => "tenant_config",
            Namespace::Setting => "tenant_setting",
            Namespace::Detection => "detection_config",
        }
    }
}
