//! Intent grant repository implementation.

use std::collections::{BTreeMap, BTreeSet};

use sqlx::SqlitePool;
use tracing::info;

use nashub_core::error::{AppError, ErrorKind};
use nashub_core::result::AppResult;
use nashub_entity::intent::Intent;
use nashub_entity::user::{User, UserWithIntents};

/// Repository for intent grant rows.
#[derive(Debug, Clone)]
pub struct IntentRepository {
    pool: SqlitePool,
}

impl IntentRepository {
    /// Create a new intent repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The set of capabilities granted to a user.
    pub async fn list_for_user(&self, user_id: i64) -> AppResult<BTreeSet<Intent>> {
        let rows: Vec<Intent> =
            sqlx::query_scalar("SELECT intent FROM user_intents WHERE user_id = ?1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to list grants", e)
                })?;

        Ok(rows.into_iter().collect())
    }

    /// Whether the user holds the given capability. No ADMIN wildcard
    /// handling here; that belongs to the evaluator.
    pub async fn exists(&self, user_id: i64, intent: Intent) -> AppResult<bool> {
        let found: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_intents WHERE user_id = ?1 AND intent = ?2)",
        )
        .bind(user_id)
        .bind(intent)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check grant", e))?;

        Ok(found != 0)
    }

    /// Grant a capability. Idempotent; returns whether a new row was
    /// inserted.
    pub async fn grant(&self, user_id: i64, intent: Intent) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO user_intents (user_id, intent) VALUES (?1, ?2)",
        )
        .bind(user_id)
        .bind(intent)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to grant intent", e))?;

        if result.rows_affected() > 0 {
            info!(user_id, intent = %intent, "Granted intent");
        }
        Ok(result.rows_affected() > 0)
    }

    /// Revoke a capability. Revocation is a delete, not a soft-disable.
    /// Idempotent; returns whether a row was removed.
    pub async fn revoke(&self, user_id: i64, intent: Intent) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM user_intents WHERE user_id = ?1 AND intent = ?2",
        )
        .bind(user_id)
        .bind(intent)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke intent", e))?;

        if result.rows_affected() > 0 {
            info!(user_id, intent = %intent, "Revoked intent");
        }
        Ok(result.rows_affected() > 0)
    }

    /// Every user together with their grants, ordered by surrogate key.
    pub async fn list_users_with_grants(&self) -> AppResult<Vec<UserWithIntents>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))?;

        let rows: Vec<(i64, Intent)> =
            sqlx::query_as("SELECT user_id, intent FROM user_intents")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to list grants", e)
                })?;

        let mut by_user: BTreeMap<i64, BTreeSet<Intent>> = BTreeMap::new();
        for (user_id, intent) in rows {
            by_user.entry(user_id).or_default().insert(intent);
        }

        Ok(users
            .into_iter()
            .map(|user| {
                let intents = by_user.remove(&user.id).unwrap_or_default();
                UserWithIntents { user, intents }
            })
            .collect())
    }
}
