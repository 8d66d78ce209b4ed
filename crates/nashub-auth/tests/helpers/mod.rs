//! Shared test helpers for integration tests.

use sqlx::SqlitePool;

use nashub_auth::AuthService;
use nashub_core::config::auth::{AuthConfig, AuthType, PasswordPolicy};
use nashub_core::config::database::DatabaseConfig;
use nashub_database::{DatabasePool, migration};

/// Policy with every rule disabled.
pub fn relaxed_policy() -> PasswordPolicy {
    PasswordPolicy {
        min_length: 0,
        require_uppercase: false,
        require_lowercase: false,
        require_number: false,
        require_special: false,
    }
}

/// Policy requiring 8+ characters with an uppercase letter and a digit.
pub fn strict_policy() -> PasswordPolicy {
    PasswordPolicy {
        min_length: 8,
        require_uppercase: true,
        require_lowercase: false,
        require_number: true,
        require_special: false,
    }
}

/// Auth configuration with a fixed test signing secret.
pub fn test_config(auth_type: AuthType, policy: PasswordPolicy) -> AuthConfig {
    AuthConfig {
        auth_type,
        jwt_secret: "test-secret".to_string(),
        token_ttl_days: 7,
        password: policy,
    }
}

/// An `AuthService` over a fresh in-memory database with migrations
/// applied.
pub async fn test_service(auth_type: AuthType, policy: PasswordPolicy) -> (AuthService, SqlitePool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .try_init();

    let db = DatabasePool::connect(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to open in-memory database");
    let pool = db.into_pool();
    migration::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let config = test_config(auth_type, policy);
    (AuthService::new(&config, pool.clone()), pool)
}
