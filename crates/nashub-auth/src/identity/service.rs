//! The authentication facade exposed to the HTTP layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::BTreeSet;
use tracing::info;

use nashub_core::config::auth::{AuthConfig, AuthType};
use nashub_core::error::{AppError, ErrorKind};
use nashub_core::result::AppResult;
use nashub_database::repositories::{IntentRepository, UserRepository};
use nashub_entity::intent::Intent;
use nashub_entity::user::model::CreateLocalUser;
use nashub_entity::user::{ProviderProfile, User, UserWithIntents};

use crate::intent::IntentEvaluator;
use crate::password::{PasswordHasher, PasswordValidator};
use crate::token::{TokenDecoder, TokenEncoder};

use super::provider::ProviderClient;

/// A successful authentication: a bearer token plus the resolved user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// The signed bearer token.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// The authenticated user with their current grants.
    pub user: UserWithIntents,
}

/// Outcome of presenting an OAuth identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OauthLogin {
    /// The identity is known; a session was issued.
    Existing(AuthSession),
    /// First login for this identity. No row and no token were created;
    /// registration is a distinct, explicit second step.
    New(ProviderProfile),
}

/// Authentication, registration, and grant administration.
///
/// Invoked synchronously per inbound request; all shared mutable state
/// lives in the backing store.
#[derive(Debug, Clone)]
pub struct AuthService {
    users: UserRepository,
    intents: IntentRepository,
    evaluator: IntentEvaluator,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    encoder: TokenEncoder,
    decoder: TokenDecoder,
    auth_type: AuthType,
}

impl AuthService {
    /// Creates the service from auth configuration and a database pool.
    pub fn new(config: &AuthConfig, pool: SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            intents: IntentRepository::new(pool.clone()),
            evaluator: IntentEvaluator::new(pool),
            hasher: PasswordHasher::new(),
            validator: PasswordValidator::new(&config.password),
            encoder: TokenEncoder::new(config),
            decoder: TokenDecoder::new(config),
            auth_type: config.auth_type,
        }
    }

    fn ensure_local_enabled(&self) -> AppResult<()> {
        if !self.auth_type.local_enabled() {
            return Err(AppError::auth_disabled(
                "Local authentication is disabled. Please use OAuth.",
            ));
        }
        Ok(())
    }

    fn ensure_oauth_enabled(&self) -> AppResult<()> {
        if !self.auth_type.oauth_enabled() {
            return Err(AppError::auth_disabled(
                "OAuth authentication is disabled.",
            ));
        }
        Ok(())
    }

    async fn with_intents(&self, user: User) -> AppResult<UserWithIntents> {
        let intents = self.intents.list_for_user(user.id).await?;
        Ok(UserWithIntents { user, intents })
    }

    async fn issue_session(&self, user: User) -> AppResult<AuthSession> {
        let issued = self.encoder.issue(&user.external_id)?;
        let user = self.with_intents(user).await?;
        Ok(AuthSession {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        })
    }

    /// Presents an OAuth identity. Known identities log in immediately;
    /// unknown ones come back as [`OauthLogin::New`] so the caller can
    /// collect the localized name and call [`Self::register_oauth`].
    pub async fn oauth_login(&self, profile: &ProviderProfile) -> AppResult<OauthLogin> {
        self.ensure_oauth_enabled()?;

        match self.users.find_by_external_id(&profile.external_id).await? {
            Some(user) => {
                info!(external_id = %user.external_id, "OAuth login");
                Ok(OauthLogin::Existing(self.issue_session(user).await?))
            }
            None => Ok(OauthLogin::New(profile.clone())),
        }
    }

    /// Resolves a provider access token to a profile, then presents it
    /// as in [`Self::oauth_login`].
    pub async fn oauth_login_with_token(
        &self,
        provider: &dyn ProviderClient,
        access_token: &str,
    ) -> AppResult<OauthLogin> {
        self.ensure_oauth_enabled()?;
        let profile = provider.fetch_profile(access_token).await?;
        self.oauth_login(&profile).await
    }

    /// Completes OAuth registration with the caller-supplied localized
    /// name, creating or resyncing the user row and issuing a session.
    pub async fn register_oauth(
        &self,
        profile: &ProviderProfile,
        localized_name: &str,
    ) -> AppResult<AuthSession> {
        self.ensure_oauth_enabled()?;

        let user_id = self
            .users
            .upsert_from_provider(profile, localized_name)
            .await?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found after registration"))?;

        info!(external_id = %user.external_id, "OAuth registration complete");
        self.issue_session(user).await
    }

    /// Registers a local ID/password account and issues a session.
    pub async fn register_local(
        &self,
        external_id: &str,
        display_name: &str,
        password: &str,
        localized_name: Option<&str>,
    ) -> AppResult<AuthSession> {
        self.ensure_local_enabled()?;

        if self
            .users
            .find_by_external_id(external_id)
            .await?
            .is_some()
        {
            return Err(AppError::duplicate_identity("User ID already exists"));
        }

        self.validator.validate(password)?;
        let password_hash = self.hasher.hash_password(password)?;

        let user = self
            .users
            .create_local(&CreateLocalUser {
                external_id: external_id.to_string(),
                display_name: display_name.to_string(),
                password_hash,
                localized_name: localized_name.map(str::to_string),
            })
            .await?;

        info!(external_id = %user.external_id, "Local user registered");
        self.issue_session(user).await
    }

    /// Logs in with a local ID and password.
    ///
    /// Unknown ID and wrong password produce the identical error; no
    /// information leaks distinguishing the two.
    pub async fn login_local(&self, external_id: &str, password: &str) -> AppResult<AuthSession> {
        self.ensure_local_enabled()?;

        let user = self
            .users
            .find_local_by_external_id(external_id)
            .await?
            .ok_or_else(AppError::invalid_credentials)?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or_else(AppError::invalid_credentials)?;

        if !self.hasher.verify_password(password, hash)? {
            return Err(AppError::invalid_credentials());
        }

        info!(external_id = %user.external_id, "Local login");
        self.issue_session(user).await
    }

    /// Changes a local account's password.
    ///
    /// On success only the stored hash is overwritten; previously issued
    /// tokens stay valid until their natural expiry.
    pub async fn change_password(
        &self,
        external_id: &str,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self
            .users
            .find_local_by_external_id(external_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or_else(AppError::invalid_credentials)?;

        if !self.hasher.verify_password(old_password, hash)? {
            return Err(AppError::new(
                ErrorKind::InvalidCredentials,
                "Invalid old password",
            ));
        }

        self.validator.validate(new_password)?;
        let new_hash = self.hasher.hash_password(new_password)?;
        self.users.update_password(user.id, &new_hash).await?;

        info!(external_id = %user.external_id, "Password changed");
        Ok(())
    }

    /// Decodes a bearer token to the external ID it identifies.
    pub fn decode(&self, token: &str) -> AppResult<String> {
        Ok(self.decoder.decode(token)?.sub)
    }

    /// Whether the bearer of the token holds the given capability.
    ///
    /// An unknown subject authorizes nothing rather than erroring.
    pub async fn authorize(&self, token: &str, intent: Intent) -> AppResult<bool> {
        let external_id = self.decode(token)?;
        match self.users.find_by_external_id(&external_id).await? {
            Some(user) => self.evaluator.has(user.id, intent).await,
            None => Ok(false),
        }
    }

    /// The set of capabilities granted to a user.
    pub async fn grants_of(&self, external_id: &str) -> AppResult<BTreeSet<Intent>> {
        let user = self
            .users
            .find_by_external_id(external_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        self.intents.list_for_user(user.id).await
    }

    /// Every user with their grants, ordered by surrogate key.
    pub async fn all_users(&self) -> AppResult<Vec<UserWithIntents>> {
        self.intents.list_users_with_grants().await
    }

    async fn ensure_admin(&self, acting_external_id: &str) -> AppResult<()> {
        let acting = self
            .users
            .find_by_external_id(acting_external_id)
            .await?
            .ok_or_else(|| AppError::forbidden("Requires the ADMIN capability"))?;

        if !self.evaluator.has(acting.id, Intent::Admin).await? {
            return Err(AppError::forbidden("Requires the ADMIN capability"));
        }
        Ok(())
    }

    async fn target_id(&self, target_external_id: &str) -> AppResult<i64> {
        Ok(self
            .users
            .find_by_external_id(target_external_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?
            .id)
    }

    /// Flips a grant on the target user. Admin-only; returns the new
    /// state (`true` = granted).
    pub async fn toggle_grant(
        &self,
        acting_external_id: &str,
        target_external_id: &str,
        intent: Intent,
    ) -> AppResult<bool> {
        self.ensure_admin(acting_external_id).await?;
        let target = self.target_id(target_external_id).await?;
        self.evaluator.toggle(target, intent).await
    }

    /// Grants a capability to the target user. Admin-only, idempotent.
    pub async fn grant_intent(
        &self,
        acting_external_id: &str,
        target_external_id: &str,
        intent: Intent,
    ) -> AppResult<()> {
        self.ensure_admin(acting_external_id).await?;
        let target = self.target_id(target_external_id).await?;
        self.evaluator.grant(target, intent).await
    }

    /// Revokes a capability from the target user. Admin-only, idempotent.
    pub async fn revoke_intent(
        &self,
        acting_external_id: &str,
        target_external_id: &str,
        intent: Intent,
    ) -> AppResult<()> {
        self.ensure_admin(acting_external_id).await?;
        let target = self.target_id(target_external_id).await?;
        self.evaluator.revoke(target, intent).await
    }
}
