//! Bearer token claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The claims payload embedded in every bearer token.
///
/// The shape is fixed: a subject and an expiry instant, nothing else.
/// Decoding rejects payloads carrying any other field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    /// Subject: the user's external ID.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the external ID from the subject claim.
    pub fn external_id(&self) -> &str {
        &self.sub
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}
