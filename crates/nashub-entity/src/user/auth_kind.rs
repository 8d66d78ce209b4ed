//! Account credential management kind.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether an account's credentials are managed locally (password) or by
/// an external OAuth provider. Set at creation, never mutated afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AuthKind {
    /// Local ID/password account.
    Local,
    /// Account backed by an external OAuth provider.
    Oauth,
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Oauth => write!(f, "oauth"),
        }
    }
}
