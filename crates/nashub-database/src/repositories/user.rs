//! User repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use nashub_core::error::{AppError, ErrorKind};
use nashub_core::result::AppResult;
use nashub_entity::user::model::{CreateLocalUser, ProviderProfile};
use nashub_entity::user::{AuthKind, User};

/// Repository for user CRUD and lookup operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a user by surrogate key.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Find a user by external ID. Exact match, no case-folding.
    pub async fn find_by_external_id(&self, external_id: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE external_id = ?1")
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by external id", e)
            })
    }

    /// Find a local-auth user by external ID. OAuth accounts are not
    /// visible to local login.
    pub async fn find_local_by_external_id(&self, external_id: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE external_id = ?1 AND auth_kind = ?2",
        )
        .bind(external_id)
        .bind(AuthKind::Local)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find local user", e)
        })
    }

    /// List all users ordered by surrogate key.
    pub async fn find_all(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))
    }

    /// Insert or update a user from an OAuth provider profile, returning
    /// the surrogate key either way.
    ///
    /// If no row exists for the external ID, a new OAuth-kind user is
    /// inserted. If one exists, only the mutable profile fields are
    /// resynced; `auth_kind` and `password_hash` stay untouched. Two
    /// concurrent first logins can both pass the not-found check; the
    /// unique constraint makes one insert fail, and that loser re-reads
    /// and proceeds as an update.
    pub async fn upsert_from_provider(
        &self,
        profile: &ProviderProfile,
        localized_name: &str,
    ) -> AppResult<i64> {
        if let Some(existing) = self.find_by_external_id(&profile.external_id).await? {
            self.resync_profile(existing.id, profile, localized_name)
                .await?;
            return Ok(existing.id);
        }

        match self.insert_oauth(profile, localized_name).await {
            Ok(id) => Ok(id),
            Err(e) if e.kind == ErrorKind::DuplicateIdentity => {
                // Someone else just created it; re-read and proceed.
                let existing = self
                    .find_by_external_id(&profile.external_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::database("User vanished after duplicate insert")
                    })?;
                self.resync_profile(existing.id, profile, localized_name)
                    .await?;
                Ok(existing.id)
            }
            Err(e) => Err(e),
        }
    }

    async fn insert_oauth(
        &self,
        profile: &ProviderProfile,
        localized_name: &str,
    ) -> AppResult<i64> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO users (external_id, display_name, global_name, localized_name, auth_kind, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        )
        .bind(&profile.external_id)
        .bind(&profile.display_name)
        .bind(&profile.global_name)
        .bind(localized_name)
        .bind(AuthKind::Oauth)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::duplicate_identity(format!(
                    "User '{}' already exists",
                    profile.external_id
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
        })?;

        info!(external_id = %profile.external_id, "Created OAuth user");
        Ok(result.last_insert_rowid())
    }

    async fn resync_profile(
        &self,
        id: i64,
        profile: &ProviderProfile,
        localized_name: &str,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET display_name = ?2, global_name = ?3, localized_name = ?4, \
                              updated_at = ?5 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(&profile.display_name)
        .bind(&profile.global_name)
        .bind(localized_name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update user", e))?;
        Ok(())
    }

    /// Create a local ID/password account. Fails with `DuplicateIdentity`
    /// if the external ID is taken.
    pub async fn create_local(&self, data: &CreateLocalUser) -> AppResult<User> {
        let now = Utc::now();
        sqlx::query_as::<_, User>(
            "INSERT INTO users (external_id, display_name, global_name, localized_name, password_hash, auth_kind, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) \
             RETURNING *",
        )
        .bind(&data.external_id)
        .bind(&data.display_name)
        // Mirrors the display name, as providers do for their global name.
        .bind(&data.display_name)
        .bind(&data.localized_name)
        .bind(&data.password_hash)
        .bind(AuthKind::Local)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::duplicate_identity("User ID already exists")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
        })
    }

    /// Overwrite a user's password hash. Issued tokens are unaffected.
    pub async fn update_password(&self, user_id: i64, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(user_id)
        .bind(password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update password", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }
        Ok(())
    }

    /// Delete a user. Intent grants cascade.
    pub async fn delete(&self, user_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete user", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Count total users.
    pub async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count users", e))?;
        Ok(count as u64)
    }
}
