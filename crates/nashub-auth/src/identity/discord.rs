//! Discord OAuth identity client.

use async_trait::async_trait;
use serde::Deserialize;

use nashub_core::error::AppError;
use nashub_core::result::AppResult;
use nashub_entity::user::ProviderProfile;

use super::provider::ProviderClient;

const IDENTITY_URL: &str = "https://discord.com/api/users/@me";

/// Fetches user identity from Discord's `/users/@me` endpoint.
#[derive(Debug, Clone)]
pub struct DiscordProvider {
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct DiscordUser {
    id: String,
    username: String,
    global_name: Option<String>,
}

impl DiscordProvider {
    /// Creates a new Discord identity client.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for DiscordProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderClient for DiscordProvider {
    async fn fetch_profile(&self, access_token: &str) -> AppResult<ProviderProfile> {
        let user: DiscordUser = self
            .http
            .get(IDENTITY_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Discord request failed: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::external_service(format!("Discord rejected the token: {e}")))?
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("Invalid Discord response: {e}")))?;

        Ok(ProviderProfile {
            external_id: user.id,
            display_name: user.username,
            global_name: user.global_name,
        })
    }
}
