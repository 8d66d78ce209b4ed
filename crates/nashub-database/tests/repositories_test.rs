//! Integration tests for the credential store repositories.

use sqlx::SqlitePool;

use nashub_core::config::database::DatabaseConfig;
use nashub_core::error::ErrorKind;
use nashub_database::repositories::{IntentRepository, UserRepository};
use nashub_database::{DatabasePool, migration};
use nashub_entity::intent::Intent;
use nashub_entity::user::model::{CreateLocalUser, ProviderProfile};
use nashub_entity::user::AuthKind;

async fn test_pool() -> SqlitePool {
    let db = DatabasePool::connect(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to open in-memory database");
    let pool = db.into_pool();
    migration::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

fn profile(external_id: &str, display_name: &str) -> ProviderProfile {
    ProviderProfile {
        external_id: external_id.to_string(),
        display_name: display_name.to_string(),
        global_name: Some(display_name.to_string()),
    }
}

#[tokio::test]
async fn test_upsert_inserts_then_resyncs() {
    let pool = test_pool().await;
    let users = UserRepository::new(pool);

    let id = users
        .upsert_from_provider(&profile("discord-1", "gamer"), "게이머")
        .await
        .unwrap();

    let user = users.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(user.auth_kind, AuthKind::Oauth);
    assert_eq!(user.display_name, "gamer");
    assert!(user.password_hash.is_none());

    // Same identity again: same row, profile fields resynced.
    let id2 = users
        .upsert_from_provider(&profile("discord-1", "pro_gamer"), "프로")
        .await
        .unwrap();
    assert_eq!(id, id2);

    let user = users.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(user.display_name, "pro_gamer");
    assert_eq!(user.localized_name.as_deref(), Some("프로"));
    // auth_kind stays untouched.
    assert_eq!(user.auth_kind, AuthKind::Oauth);
    assert_eq!(users.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_first_logins_resolve_to_one_row() {
    let pool = test_pool().await;
    let left = UserRepository::new(pool.clone());
    let right = UserRepository::new(pool);

    // Two racers upsert the same unseen identity at once. The unique
    // constraint arbitrates: the loser re-reads and both land on the
    // same row.
    for round in 0..20 {
        let p = profile(&format!("discord-{round}"), "gamer");
        let (a, b) = tokio::join!(
            left.upsert_from_provider(&p, "게이머"),
            right.upsert_from_provider(&p, "게이머"),
        );
        assert_eq!(a.unwrap(), b.unwrap());
    }
    assert_eq!(left.count().await.unwrap(), 20);
}

#[tokio::test]
async fn test_external_id_lookup_is_exact() {
    let pool = test_pool().await;
    let users = UserRepository::new(pool);

    users
        .upsert_from_provider(&profile("Discord-1", "gamer"), "")
        .await
        .unwrap();

    assert!(users.find_by_external_id("Discord-1").await.unwrap().is_some());
    // No case-folding.
    assert!(users.find_by_external_id("discord-1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_local_duplicate() {
    let pool = test_pool().await;
    let users = UserRepository::new(pool);

    let data = CreateLocalUser {
        external_id: "u1".to_string(),
        display_name: "User One".to_string(),
        password_hash: "$argon2id$fake".to_string(),
        localized_name: None,
    };
    let user = users.create_local(&data).await.unwrap();
    assert_eq!(user.auth_kind, AuthKind::Local);

    let err = users.create_local(&data).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateIdentity);
}

#[tokio::test]
async fn test_local_lookup_excludes_oauth_accounts() {
    let pool = test_pool().await;
    let users = UserRepository::new(pool);

    users
        .upsert_from_provider(&profile("discord-1", "gamer"), "")
        .await
        .unwrap();

    assert!(
        users
            .find_local_by_external_id("discord-1")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_grants_round_trip_through_listing() {
    let pool = test_pool().await;
    let users = UserRepository::new(pool.clone());
    let intents = IntentRepository::new(pool);

    let a = users
        .upsert_from_provider(&profile("a", "Alpha"), "")
        .await
        .unwrap();
    let b = users
        .upsert_from_provider(&profile("b", "Beta"), "")
        .await
        .unwrap();

    intents.grant(a, Intent::Admin).await.unwrap();
    intents.grant(b, Intent::View).await.unwrap();
    intents.grant(b, Intent::Download).await.unwrap();

    let listing = intents.list_users_with_grants().await.unwrap();
    assert_eq!(listing.len(), 2);
    assert!(listing[0].intents.contains(&Intent::Admin));
    assert_eq!(listing[1].intents.len(), 2);
    assert!(listing[1].has_intent(Intent::View));
    // ADMIN wildcard applies through the entity helper as well.
    assert!(listing[0].has_intent(Intent::Rename));
    assert!(!listing[1].has_intent(Intent::Rename));
}
