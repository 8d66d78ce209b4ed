//! Records user activity against the activity log table.

use chrono::Utc;
use sqlx::SqlitePool;

use nashub_core::config::auth::AuthConfig;
use nashub_core::error::AppError;
use nashub_core::result::AppResult;
use nashub_database::repositories::{ActivityRepository, UserRepository};
use nashub_entity::activity::ActivityEntry;

use crate::token::TokenDecoder;

/// Records activities performed by token-bearing callers.
#[derive(Debug, Clone)]
pub struct ActivityRecorder {
    users: UserRepository,
    activity: ActivityRepository,
    decoder: TokenDecoder,
}

impl ActivityRecorder {
    /// Creates a new recorder.
    pub fn new(config: &AuthConfig, pool: SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            activity: ActivityRepository::new(pool),
            decoder: TokenDecoder::new(config),
        }
    }

    /// Records one activity for the bearer of the token.
    pub async fn record(
        &self,
        token: &str,
        activity: &str,
        description: Option<&str>,
        loc: Option<&str>,
    ) -> AppResult<()> {
        let claims = self.decoder.decode(token)?;
        let user = self
            .users
            .find_by_external_id(&claims.sub)
            .await?
            .ok_or_else(|| AppError::not_found("User not found for logging"))?;

        let normalized = loc.map(normalize_loc);
        self.activity
            .insert(
                user.id,
                activity,
                description,
                Utc::now(),
                normalized.as_deref(),
            )
            .await
    }

    /// Activity entries joined with user profiles, newest first.
    pub async fn recent(&self, limit: i64) -> AppResult<Vec<ActivityEntry>> {
        self.activity.list_recent(limit).await
    }
}

/// Strips leading empty path segments, so `"/a/b"` becomes `"a/b"`.
fn normalize_loc(loc: &str) -> String {
    let mut parts: Vec<&str> = loc.split('/').collect();
    while parts.len() > 1 && parts[0].is_empty() {
        parts.remove(0);
    }
    parts.join("/")
}
