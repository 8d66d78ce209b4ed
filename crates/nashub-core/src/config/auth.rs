//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Placeholder secret that must never reach a production deployment.
const DEFAULT_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Which authentication protocols are reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// Only local ID/password accounts.
    Local,
    /// Only external OAuth providers.
    Oauth,
    /// Both protocols enabled.
    Both,
}

impl AuthType {
    /// Whether local ID/password authentication is reachable.
    pub fn local_enabled(&self) -> bool {
        matches!(self, Self::Local | Self::Both)
    }

    /// Whether OAuth authentication is reachable.
    pub fn oauth_enabled(&self) -> bool {
        matches!(self, Self::Oauth | Self::Both)
    }
}

/// Password complexity policy for local accounts.
///
/// Every rule is independently togglable. All flags false with a minimum
/// length of zero admits any password; this is intentional small-deployment
/// flexibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordPolicy {
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub min_length: usize,
    /// Require at least one uppercase letter.
    #[serde(default)]
    pub require_uppercase: bool,
    /// Require at least one lowercase letter.
    #[serde(default)]
    pub require_lowercase: bool,
    /// Require at least one digit.
    #[serde(default)]
    pub require_number: bool,
    /// Require at least one special character.
    #[serde(default)]
    pub require_special: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: default_password_min(),
            require_uppercase: false,
            require_lowercase: false,
            require_number: false,
            require_special: false,
        }
    }
}

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Which authentication protocols are reachable.
    #[serde(default = "default_auth_type")]
    pub auth_type: AuthType,
    /// Secret key for JWT signing (HMAC-SHA256). Process-wide, read-only
    /// after startup.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Bearer token TTL in days.
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: u64,
    /// Password complexity policy.
    #[serde(default)]
    pub password: PasswordPolicy,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            auth_type: default_auth_type(),
            jwt_secret: default_jwt_secret(),
            token_ttl_days: default_token_ttl_days(),
            password: PasswordPolicy::default(),
        }
    }
}

impl AuthConfig {
    /// Validate the configuration for the given environment.
    ///
    /// A production deployment refuses to start with the placeholder
    /// signing secret.
    pub fn validate(&self, env: &str) -> Result<(), AppError> {
        if env == "production" && (self.jwt_secret.is_empty() || self.jwt_secret == DEFAULT_SECRET)
        {
            return Err(AppError::configuration(
                "auth.jwt_secret must be set to an explicit non-default value in production",
            ));
        }
        Ok(())
    }
}

fn default_auth_type() -> AuthType {
    AuthType::Both
}

fn default_jwt_secret() -> String {
    DEFAULT_SECRET.to_string()
}

fn default_token_ttl_days() -> u64 {
    7
}

fn default_password_min() -> usize {
    8
}
