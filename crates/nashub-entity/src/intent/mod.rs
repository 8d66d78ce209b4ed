//! The intent (capability) model.
//!
//! An intent is a named capability a user may hold, gating one class of
//! file operation. The set is closed; there is no hierarchy among the
//! non-ADMIN tags, and each file operation checks exactly one named
//! capability. ADMIN is the wildcard implying every other capability.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use nashub_core::error::AppError;

/// A capability tag gating one class of file operation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Intent {
    /// Superuser wildcard implying every other capability.
    Admin,
    /// Browse directory listings.
    View,
    /// Open/stream a file in place.
    Open,
    /// Download a file.
    Download,
    /// Upload a file.
    Upload,
    /// Copy or move a file.
    Copy,
    /// Delete a file.
    Delete,
    /// Rename a file.
    Rename,
}

impl Intent {
    /// Every capability tag, in display order.
    pub const ALL: [Intent; 8] = [
        Intent::Admin,
        Intent::View,
        Intent::Open,
        Intent::Download,
        Intent::Upload,
        Intent::Copy,
        Intent::Delete,
        Intent::Rename,
    ];

    /// Return the capability tag as its canonical string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::View => "VIEW",
            Self::Open => "OPEN",
            Self::Download => "DOWNLOAD",
            Self::Upload => "UPLOAD",
            Self::Copy => "COPY",
            Self::Delete => "DELETE",
            Self::Rename => "RENAME",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Intent {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "VIEW" => Ok(Self::View),
            "OPEN" => Ok(Self::Open),
            "DOWNLOAD" => Ok(Self::Download),
            "UPLOAD" => Ok(Self::Upload),
            "COPY" => Ok(Self::Copy),
            "DELETE" => Ok(Self::Delete),
            "RENAME" => Ok(Self::Rename),
            other => Err(AppError::not_found(format!("Unknown intent '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_tags() {
        for intent in Intent::ALL {
            assert_eq!(intent.as_str().parse::<Intent>().unwrap(), intent);
        }
    }

    #[test]
    fn test_unknown_tag_rejected() {
        assert!("EXECUTE".parse::<Intent>().is_err());
        // Matching is exact, not case-folded.
        assert!("admin".parse::<Intent>().is_err());
    }
}
