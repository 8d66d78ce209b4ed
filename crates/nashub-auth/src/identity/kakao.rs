//! Kakao OAuth identity client.
//!
//! Unlike Discord, the front-end hands over an authorization code rather
//! than an access token, so this client also performs the code/token
//! exchange against `kauth.kakao.com`.

use async_trait::async_trait;
use serde::Deserialize;

use nashub_core::error::AppError;
use nashub_core::result::AppResult;
use nashub_entity::user::ProviderProfile;

use super::provider::ProviderClient;

const TOKEN_URL: &str = "https://kauth.kakao.com/oauth/token";
const IDENTITY_URL: &str = "https://kapi.kakao.com/v2/user/me";

/// Fetches user identity from Kakao's user endpoint.
#[derive(Debug, Clone)]
pub struct KakaoProvider {
    http: reqwest::Client,
    rest_api_key: String,
    client_secret: String,
    redirect_uri: String,
}

#[derive(Debug, Deserialize)]
struct KakaoToken {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct KakaoUser {
    id: i64,
    properties: KakaoProperties,
}

#[derive(Debug, Deserialize)]
struct KakaoProperties {
    nickname: String,
}

impl KakaoProvider {
    /// Creates a new Kakao identity client.
    pub fn new(rest_api_key: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            rest_api_key,
            client_secret,
            redirect_uri,
        }
    }

    /// Exchanges an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> AppResult<String> {
        let token: KakaoToken = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "authorization_code"),
                ("client_id", self.rest_api_key.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
            ])
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Kakao token request failed: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::external_service(format!("Kakao rejected the code: {e}")))?
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("Invalid Kakao token response: {e}")))?;

        Ok(token.access_token)
    }
}

#[async_trait]
impl ProviderClient for KakaoProvider {
    async fn fetch_profile(&self, access_token: &str) -> AppResult<ProviderProfile> {
        let user: KakaoUser = self
            .http
            .get(IDENTITY_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Kakao request failed: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::external_service(format!("Kakao rejected the token: {e}")))?
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("Invalid Kakao response: {e}")))?;

        Ok(ProviderProfile {
            external_id: user.id.to_string(),
            display_name: user.properties.nickname.clone(),
            global_name: Some(user.properties.nickname),
        })
    }
}
