//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods return
//! `Result<_, sqlx::Error>`; the config store is the only caller and owns
//! catching and containing every failure.

pub mod credential_repo;
pub mod delivery_target_repo;
pub mod event_toggle_repo;
pub mod tenant_value_repo;

pub use credential_repo::CredentialRepo;
pub use delivery_target_repo::DeliveryTargetRepo;
pub use event_toggle_repo::EventToggleRepo;
pub use tenant_value_repo::TenantValueRepo;
