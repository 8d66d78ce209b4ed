//! Authorization predicate over intent grants.

use sqlx::SqlitePool;

use nashub_core::result::AppResult;
use nashub_database::repositories::IntentRepository;
use nashub_entity::intent::Intent;

/// Decides allow/deny for a `(user, capability)` pair and edits grants.
///
/// A pure predicate plus mutating edits; no state is held beyond the
/// backing store.
#[derive(Debug, Clone)]
pub struct IntentEvaluator {
    intents: IntentRepository,
}

impl IntentEvaluator {
    /// Creates a new evaluator over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            intents: IntentRepository::new(pool),
        }
    }

    /// Whether the user holds the given capability.
    ///
    /// ADMIN is a superuser wildcard implying every other capability and
    /// is checked first for short-circuit.
    pub async fn has(&self, user_id: i64, intent: Intent) -> AppResult<bool> {
        if self.intents.exists(user_id, Intent::Admin).await? {
            return Ok(true);
        }
        self.intents.exists(user_id, intent).await
    }

    /// Grant a capability. Idempotent.
    pub async fn grant(&self, user_id: i64, intent: Intent) -> AppResult<()> {
        self.intents.grant(user_id, intent).await?;
        Ok(())
    }

    /// Revoke a capability. Idempotent.
    pub async fn revoke(&self, user_id: i64, intent: Intent) -> AppResult<()> {
        self.intents.revoke(user_id, intent).await?;
        Ok(())
    }

    /// Flip the presence of a grant: delete if present, insert if absent.
    ///
    /// Returns the new state (`true` = granted). Applying this twice to
    /// the same pair restores the original grant state.
    pub async fn toggle(&self, user_id: i64, intent: Intent) -> AppResult<bool> {
        if self.intents.exists(user_id, intent).await? {
            self.intents.revoke(user_id, intent).await?;
            Ok(false)
        } else {
            self.intents.grant(user_id, intent).await?;
            Ok(true)
        }
    }
}
