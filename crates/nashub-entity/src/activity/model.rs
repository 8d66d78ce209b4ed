//! Activity log entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One recorded user activity (file operation, login, admin edit).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityLog {
    /// Surrogate key.
    pub id: i64,
    /// Short activity tag, e.g. `"upload"` or `"delete"`.
    pub activity: String,
    /// Free-text description.
    pub description: Option<String>,
    /// The acting user's surrogate key. Nulled when the account is
    /// deleted; the entry itself stays.
    pub user_id: Option<i64>,
    /// When the activity happened.
    pub time: DateTime<Utc>,
    /// Normalized path the activity applied to.
    pub loc: Option<String>,
}

/// An activity row joined with the acting user's profile, as returned by
/// log listings. Profile fields are absent when the account has since
/// been deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityEntry {
    /// Short activity tag.
    pub activity: String,
    /// Free-text description.
    pub description: Option<String>,
    /// When the activity happened.
    pub time: DateTime<Utc>,
    /// Normalized path the activity applied to.
    pub loc: Option<String>,
    /// The acting user's external ID.
    pub external_id: Option<String>,
    /// The acting user's display name.
    pub display_name: Option<String>,
    /// The acting user's localized name.
    pub localized_name: Option<String>,
}
