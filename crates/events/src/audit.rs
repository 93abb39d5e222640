//! Best-effort attribution against the platform's change-audit feed.
//!
//! When a privileged action (ban, kick) produces a domain event, the audit
//! feed can sometimes say who performed it. The correlation is inherently
//! racy and permission-gated, so it is advisory metadata only: it never
//! gates whether a notification is relayed, and "cannot determine" is a
//! soft success.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use hermod_core::types::{TenantId, Timestamp, UserId};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// How recent a matching audit entry must be to attribute an actor.
pub const DEFAULT_ATTRIBUTION_WINDOW: Duration = Duration::from_secs(5);

/// Audited privileged action kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Ban,
    Unban,
    Kick,
}

/// One entry from the platform's audit feed.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    /// Monotonically increasing feed id.
    pub id: i64,
    pub action: AuditAction,
    pub actor_id: UserId,
    pub target_id: UserId,
    pub created_at: Timestamp,
}

/// Error type for audit feed reads.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// The relay lacks permission to read the tenant's audit feed.
    #[error("missing permission to read the audit feed")]
    PermissionDenied,

    /// The feed could not be reached or returned an unexpected response.
    #[error("audit feed unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the platform's audit feed.
///
/// Implemented by the host platform client; tests substitute an in-memory
/// feed.
#[async_trait]
pub trait AuditFeed: Send + Sync {
    /// The single most recent entry for `action` in the tenant's feed.
    async fn latest_entry(
        &self,
        tenant_id: TenantId,
        action: AuditAction,
    ) -> Result<Option<AuditEntry>, AuditError>;

    /// Entries with an id greater than `cursor`, oldest first. A `None`
    /// cursor means the tenant has never been read.
    async fn entries_after(
        &self,
        tenant_id: TenantId,
        cursor: Option<i64>,
    ) -> Result<Vec<AuditEntry>, AuditError>;
}

/// The outcome of an attribution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribution {
    /// The audit feed named the acting user.
    Actor(UserId),
    /// No matching entry, entry too old, or feed unreadable.
    Unknown,
}

/// Attribute a just-observed action to an actor via the audit feed.
///
/// Looks at only the single most recent matching entry; an entry older than
/// `max_age` is ignored rather than guessed at. Permission failures resolve
/// to [`Attribution::Unknown`].
pub async fn attribute_recent(
    feed: &dyn AuditFeed,
    tenant_id: TenantId,
    action: AuditAction,
    target_id: UserId,
    max_age: Duration,
) -> Attribution {
    let entry = match feed.latest_entry(tenant_id, action).await {
        Ok(Some(entry)) => entry,
        Ok(None) => return Attribution::Unknown,
        Err(AuditError::PermissionDenied) => {
            tracing::debug!(tenant_id, "No permission to read audit feed");
            return Attribution::Unknown;
        }
        Err(e) => {
            tracing::warn!(tenant_id, error = %e, "Audit feed read failed");
            return Attribution::Unknown;
        }
    };

    if entry.target_id != target_id {
        return Attribution::Unknown;
    }

    let age = Utc::now().signed_duration_since(entry.created_at);
    let within_window = age >= chrono::Duration::zero()
        && age.to_std().map(|a| a <= max_age).unwrap_or(false);
    if within_window {
        Attribution::Actor(entry.actor_id)
    } else {
        Attribution::Unknown
    }
}

// ---------------------------------------------------------------------------
// AuditReconciler
// ---------------------------------------------------------------------------

/// How often the reconciler polls each registered tenant's feed.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Periodic task that advances per-tenant audit-feed cursors.
///
/// Each registered tenant has its own cursor; there is no process-global
/// position. Deeper correlation of polled entries against past events is
/// intentionally not attempted here — [`attribute_recent`] covers the
/// advisory case at event time.
pub struct AuditReconciler<F: AuditFeed> {
    feed: F,
    cursors: Mutex<HashMap<TenantId, Option<i64>>>,
    poll_interval: Duration,
}

impl<F: AuditFeed> AuditReconciler<F> {
    pub fn new(feed: F) -> Self {
        Self::with_interval(feed, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_interval(feed: F, poll_interval: Duration) -> Self {
        Self {
            feed,
            cursors: Mutex::new(HashMap::new()),
            poll_interval,
        }
    }

    /// Start tracking a tenant's feed. Idempotent; an existing cursor is
    /// kept.
    pub async fn register_tenant(&self, tenant_id: TenantId) {
        self.cursors.lock().await.entry(tenant_id).or_insert(None);
    }

    /// Stop tracking a tenant's feed and discard its cursor.
    pub async fn forget_tenant(&self, tenant_id: TenantId) {
        self.cursors.lock().await.remove(&tenant_id);
    }

    /// The current cursor for a tenant, if registered.
    pub async fn cursor(&self, tenant_id: TenantId) -> Option<Option<i64>> {
        self.cursors.lock().await.get(&tenant_id).copied()
    }

    /// Poll every registered tenant once and advance its cursor.
    ///
    /// Per-tenant failures are contained: a permission-denied or unreachable
    /// feed leaves that tenant's cursor where it was.
    pub async fn reconcile_once(&self) {
        let tenants: Vec<(TenantId, Option<i64>)> = {
            let cursors = self.cursors.lock().await;
            cursors.iter().map(|(t, c)| (*t, *c)).collect()
        };

        for (tenant_id, cursor) in tenants {
            match self.feed.entries_after(tenant_id, cursor).await {
                Ok(entries) => {
                    if let Some(newest) = entries.iter().map(|e| e.id).max() {
                        let mut cursors = self.cursors.lock().await;
                        // The tenant may have been forgotten mid-poll.
                        if let Some(slot) = cursors.get_mut(&tenant_id) {
                            *slot = Some(newest);
                        }
                        tracing::debug!(tenant_id, cursor = newest, entries = entries.len(), "Advanced audit cursor");
                    }
                }
                Err(AuditError::PermissionDenied) => {
                    tracing::debug!(tenant_id, "No permission to read audit feed");
                }
                Err(e) => {
                    tracing::warn!(tenant_id, error = %e, "Audit feed poll failed");
                }
            }
        }
    }

    /// Run the reconciliation loop until `cancel` is triggered.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.poll_interval.as_secs(),
            "Audit reconciler started"
        );

        let mut interval = tokio::time::interval(self.poll_interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Audit reconciler stopping");
                    break;
                }
                _ = interval.tick() => {
                    self.reconcile_once().await;
                }
            }
        }
    }
}
