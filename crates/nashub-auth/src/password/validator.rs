//! Password policy enforcement for new passwords.

use nashub_core::config::auth::PasswordPolicy;
use nashub_core::error::AppError;

/// The special characters accepted by the `require_special` rule.
const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Validates password strength against the configured policy.
///
/// Checks run in a fixed order: length, uppercase, lowercase, number,
/// special. The first failing check's message is returned, not an
/// aggregate of all violations.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    policy: PasswordPolicy,
}

impl PasswordValidator {
    /// Creates a new validator from the configured policy.
    pub fn new(policy: &PasswordPolicy) -> Self {
        Self {
            policy: policy.clone(),
        }
    }

    /// Validates a password against all enabled rules.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.policy.min_length {
            return Err(AppError::policy_violation(format!(
                "Password must be at least {} characters long",
                self.policy.min_length
            )));
        }

        if self.policy.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(AppError::policy_violation(
                "Password must contain at least one uppercase letter",
            ));
        }

        if self.policy.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(AppError::policy_violation(
                "Password must contain at least one lowercase letter",
            ));
        }

        if self.policy.require_number && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::policy_violation(
                "Password must contain at least one number",
            ));
        }

        if self.policy.require_special && !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
            return Err(AppError::policy_violation(
                "Password must contain at least one special character",
            ));
        }

        Ok(())
    }
}
