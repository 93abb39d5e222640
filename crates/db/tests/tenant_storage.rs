use hermod_core::types::Namespace;
use hermod_db::repositories::{
    CredentialRepo, DeliveryTargetRepo, EventToggleRepo, TenantValueRepo,
};
use sqlx::PgPool;

const TENANT: i64 = 900_100;

#[sqlx::test(migrations = "./migrations")]
async fn tenant_value_upsert_overwrites(pool: PgPool) {
    let first = serde_json::json!({"threshold": 3});
    let second = serde_json::json!({"threshold": 5});

    TenantValueRepo::set(&pool, Namespace::Config, TENANT, "spam", &first)
        .await
        .unwrap();
    TenantValueRepo::set(&pool, Namespace::Config, TENANT, "spam", &second)
        .await
        .unwrap();

    let value = TenantValueRepo::get(&pool, Namespace::Config, TENANT, "spam")
        .await
        .unwrap();
    assert_eq!(value, Some(second));

    let count = TenantValueRepo::count_for_tenant(&pool, Namespace::Config, TENANT)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn namespaces_are_isolated(pool: PgPool) {
    let value = serde_json::json!("en");
    TenantValueRepo::set(&pool, Namespace::Setting, TENANT, "locale", &value)
        .await
        .unwrap();

    let from_config = TenantValueRepo::get(&pool, Namespace::Config, TENANT, "locale")
        .await
        .unwrap();
    assert_eq!(from_config, None);

    let rows = TenantValueRepo::get_all(&pool, Namespace::Setting, TENANT)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].key, "locale");
    assert_eq!(rows[0].value, value);
}

#[sqlx::test(migrations = "./migrations")]
async fn event_toggle_crud(pool: PgPool) {
    assert_eq!(
        EventToggleRepo::get(&pool, TENANT, "message_delete").await.unwrap(),
        None
    );

    EventToggleRepo::set(&pool, TENANT, "message_delete", false)
        .await
        .unwrap();
    assert_eq!(
        EventToggleRepo::get(&pool, TENANT, "message_delete").await.unwrap(),
        Some(false)
    );

    EventToggleRepo::set(&pool, TENANT, "message_delete", true)
        .await
        .unwrap();
    let all = EventToggleRepo::get_all(&pool, TENANT).await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].enabled);
}

#[sqlx::test(migrations = "./migrations")]
async fn delivery_target_crud(pool: PgPool) {
    assert_eq!(DeliveryTargetRepo::get(&pool, TENANT).await.unwrap(), None);

    DeliveryTargetRepo::set(&pool, TENANT, "https://hook.example/abc")
        .await
        .unwrap();
    DeliveryTargetRepo::set(&pool, TENANT, "https://hook.example/def")
        .await
        .unwrap();
    assert_eq!(
        DeliveryTargetRepo::get(&pool, TENANT).await.unwrap().as_deref(),
        Some("https://hook.example/def")
    );

    assert!(DeliveryTargetRepo::delete(&pool, TENANT).await.unwrap());
    assert!(!DeliveryTargetRepo::delete(&pool, TENANT).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn credential_upsert_replaces_prior_provider(pool: PgPool) {
    CredentialRepo::set(&pool, TENANT, "openai", Some(b"ct-plain"), None)
        .await
        .unwrap();

    // A new provider replaces the row entirely, including the other column.
    CredentialRepo::set(&pool, TENANT, "github_copilot", None, Some(b"ct-grant"))
        .await
        .unwrap();

    let row = CredentialRepo::get(&pool, TENANT).await.unwrap().unwrap();
    assert_eq!(row.provider, "github_copilot");
    assert_eq!(row.encrypted_secret, None);
    assert_eq!(row.encrypted_grant.as_deref(), Some(b"ct-grant".as_slice()));

    assert!(CredentialRepo::delete(&pool, TENANT).await.unwrap());
    assert_eq!(CredentialRepo::get(&pool, TENANT).await.unwrap().is_some(), false);
}
