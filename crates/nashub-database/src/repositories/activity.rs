//! Activity log repository implementation.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use nashub_core::error::{AppError, ErrorKind};
use nashub_core::result::AppResult;
use nashub_entity::activity::ActivityEntry;

/// Repository for the activity log.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    pool: SqlitePool,
}

impl ActivityRepository {
    /// Create a new activity repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record one activity for a user.
    pub async fn insert(
        &self,
        user_id: i64,
        activity: &str,
        description: Option<&str>,
        time: DateTime<Utc>,
        loc: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO activity_log (activity, description, user_id, time, loc) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(activity)
        .bind(description)
        .bind(user_id)
        .bind(time)
        .bind(loc)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record activity", e))?;
        Ok(())
    }

    /// Activity entries joined with user profiles, newest first. Entries
    /// whose user has been deleted are kept, with null profile fields.
    pub async fn list_recent(&self, limit: i64) -> AppResult<Vec<ActivityEntry>> {
        sqlx::query_as::<_, ActivityEntry>(
            "SELECT a.activity, a.description, a.time, a.loc, \
                    u.external_id, u.display_name, u.localized_name \
             FROM activity_log a \
             LEFT JOIN users u ON a.user_id = u.id \
             ORDER BY a.time DESC \
             LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list activity", e))
    }
}
