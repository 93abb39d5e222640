use std::time::Duration;

use anyhow::Context;

/// Relay service configuration loaded from environment variables.
///
/// `DATABASE_URL` and `ENCRYPTION_KEY` are required; the process must not
/// start without them. Everything else has defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Postgres connection string.
    pub database_url: String,
    /// Secret the credential cipher key is derived from.
    pub encryption_key: String,
    /// Cache entry lifetime (default: 300 s).
    pub cache_ttl: Duration,
    /// Display name notifications are sent under (default: `Hermod`).
    pub relay_username: String,
    /// Avatar URL notifications are sent under.
    pub relay_avatar_url: Option<String>,
}

impl RelayConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var            | Default    |
    /// |--------------------|------------|
    /// | `DATABASE_URL`     | (required) |
    /// | `ENCRYPTION_KEY`   | (required) |
    /// | `CACHE_TTL_SECS`   | `300`      |
    /// | `RELAY_USERNAME`   | `Hermod`   |
    /// | `RELAY_AVATAR_URL` | (none)     |
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let encryption_key =
            std::env::var("ENCRYPTION_KEY").context("ENCRYPTION_KEY must be set")?;

        let cache_ttl_secs: u64 = std::env::var("CACHE_TTL_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .context("CACHE_TTL_SECS must be a valid u64")?;

        let relay_username =
            std::env::var("RELAY_USERNAME").unwrap_or_else(|_| "Hermod".into());
        let relay_avatar_url = std::env::var("RELAY_AVATAR_URL").ok();

        Ok(Self {
            database_url,
            encryption_key,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            relay_username,
            relay_avatar_url,
        })
    }
}
