//! User entity model.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::auth_kind::AuthKind;
use crate::intent::Intent;

/// A registered user in the Nashub system.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Process-local numeric surrogate key, assigned on creation.
    pub id: i64,
    /// The stable identity from the OAuth provider or the chosen local
    /// login ID. Unique; lookups are exact-match.
    pub external_id: String,
    /// Provider username or local display name. Resynced from the
    /// provider on every OAuth login.
    pub display_name: String,
    /// Provider global display name, if any.
    pub global_name: Option<String>,
    /// Operator-supplied localized name, set at registration.
    pub localized_name: Option<String>,
    /// Argon2 password hash. Present only for local accounts.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Whether credentials are managed locally or by an OAuth provider.
    pub auth_kind: AuthKind,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check whether this is a local ID/password account.
    pub fn is_local(&self) -> bool {
        self.auth_kind == AuthKind::Local
    }
}

/// Profile fields supplied by an external OAuth provider's identity
/// endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    /// The provider's stable user identifier.
    pub external_id: String,
    /// The provider username.
    pub display_name: String,
    /// The provider global display name, if any.
    pub global_name: Option<String>,
}

/// Data required to create a local ID/password account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLocalUser {
    /// Chosen login ID.
    pub external_id: String,
    /// Display name.
    pub display_name: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Optional localized name.
    pub localized_name: Option<String>,
}

/// A user together with the set of capabilities they hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWithIntents {
    /// The user record.
    #[serde(flatten)]
    pub user: User,
    /// Granted capability tags. Grants are a set, not a multiset.
    pub intents: BTreeSet<Intent>,
}

impl UserWithIntents {
    /// Whether the user holds the given capability, honoring the ADMIN
    /// wildcard.
    pub fn has_intent(&self, intent: Intent) -> bool {
        self.intents.contains(&Intent::Admin) || self.intents.contains(&intent)
    }
}
