//! Integration tests for registration, login, and the token lifecycle.

mod helpers;

use async_trait::async_trait;

use nashub_auth::{OauthLogin, ProviderClient};
use nashub_core::config::auth::AuthType;
use nashub_core::error::{AppError, ErrorKind};
use nashub_core::result::AppResult;
use nashub_database::repositories::UserRepository;
use nashub_entity::intent::Intent;
use nashub_entity::user::{AuthKind, ProviderProfile};

/// Provider stand-in that accepts a single known access token.
struct StubProvider {
    token: &'static str,
    profile: ProviderProfile,
}

#[async_trait]
impl ProviderClient for StubProvider {
    async fn fetch_profile(&self, access_token: &str) -> AppResult<ProviderProfile> {
        if access_token == self.token {
            Ok(self.profile.clone())
        } else {
            Err(AppError::external_service("Provider rejected the token"))
        }
    }
}

#[tokio::test]
async fn test_register_and_login_local() {
    let (service, _pool) = helpers::test_service(AuthType::Both, helpers::strict_policy()).await;

    let session = service
        .register_local("u1", "User One", "Abcdefg1", Some("사용자"))
        .await
        .unwrap();
    assert_eq!(session.user.user.external_id, "u1");
    assert_eq!(session.user.user.auth_kind, AuthKind::Local);
    assert!(session.user.intents.is_empty());

    let login = service.login_local("u1", "Abcdefg1").await.unwrap();
    assert_eq!(login.user.user.external_id, "u1");
    assert_eq!(service.decode(&login.token).unwrap(), "u1");
}

#[tokio::test]
async fn test_password_policy_gates_registration() {
    let (service, _pool) = helpers::test_service(AuthType::Both, helpers::strict_policy()).await;

    let err = service
        .register_local("u1", "User One", "abcdefg1", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::PolicyViolation);
    assert!(err.message.contains("uppercase"));

    assert!(
        service
            .register_local("u1", "User One", "Abcdefg1", None)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_duplicate_registration_preserves_first_user() {
    let (service, pool) = helpers::test_service(AuthType::Both, helpers::relaxed_policy()).await;
    let users = UserRepository::new(pool);

    service
        .register_local("u1", "First", "password-one", None)
        .await
        .unwrap();
    let original = users.find_by_external_id("u1").await.unwrap().unwrap();

    let err = service
        .register_local("u1", "Second", "password-two", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateIdentity);

    let after = users.find_by_external_id("u1").await.unwrap().unwrap();
    assert_eq!(after.password_hash, original.password_hash);
    assert_eq!(after.display_name, "First");
}

#[tokio::test]
async fn test_credential_failures_are_undifferentiated() {
    let (service, _pool) = helpers::test_service(AuthType::Both, helpers::relaxed_policy()).await;

    service
        .register_local("u1", "User One", "right-password", None)
        .await
        .unwrap();

    let unknown = service.login_local("nobody", "whatever").await.unwrap_err();
    let wrong = service.login_local("u1", "wrong-password").await.unwrap_err();

    assert_eq!(unknown.kind, ErrorKind::InvalidCredentials);
    assert_eq!(wrong.kind, ErrorKind::InvalidCredentials);
    assert_eq!(unknown.message, wrong.message);
}

#[tokio::test]
async fn test_local_auth_disabled() {
    let (service, _pool) = helpers::test_service(AuthType::Oauth, helpers::relaxed_policy()).await;

    let err = service
        .register_local("u1", "Name", "Passw0rd!", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AuthDisabled);

    let err = service.login_local("u1", "Passw0rd!").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::AuthDisabled);
}

#[tokio::test]
async fn test_oauth_users_cannot_login_locally() {
    let (service, _pool) = helpers::test_service(AuthType::Both, helpers::relaxed_policy()).await;

    let profile = ProviderProfile {
        external_id: "discord-1".to_string(),
        display_name: "gamer".to_string(),
        global_name: Some("Gamer".to_string()),
    };
    service.register_oauth(&profile, "게이머").await.unwrap();

    let err = service
        .login_local("discord-1", "anything")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
}

#[tokio::test]
async fn test_change_password() {
    let (service, _pool) = helpers::test_service(AuthType::Both, helpers::relaxed_policy()).await;

    service
        .register_local("u1", "User One", "old-password", None)
        .await
        .unwrap();

    let err = service
        .change_password("nobody", "old-password", "new-password")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = service
        .change_password("u1", "wrong", "new-password")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);

    service
        .change_password("u1", "old-password", "new-password")
        .await
        .unwrap();

    assert!(service.login_local("u1", "old-password").await.is_err());
    assert!(service.login_local("u1", "new-password").await.is_ok());
}

#[tokio::test]
async fn test_oauth_first_login_then_register() {
    let (service, _pool) = helpers::test_service(AuthType::Both, helpers::relaxed_policy()).await;

    let profile = ProviderProfile {
        external_id: "discord-42".to_string(),
        display_name: "gamer".to_string(),
        global_name: Some("Gamer".to_string()),
    };

    // First contact: no row, no token.
    match service.oauth_login(&profile).await.unwrap() {
        OauthLogin::New(returned) => assert_eq!(returned, profile),
        OauthLogin::Existing(_) => panic!("identity should be unknown"),
    }
    assert!(service.grants_of("discord-42").await.is_err());

    // Explicit registration step.
    let session = service.register_oauth(&profile, "게이머").await.unwrap();
    assert_eq!(session.user.user.auth_kind, AuthKind::Oauth);
    assert_eq!(session.user.user.localized_name.as_deref(), Some("게이머"));

    // Second login resyncs profile fields from the provider.
    let renamed = ProviderProfile {
        display_name: "pro_gamer".to_string(),
        ..profile.clone()
    };
    match service.oauth_login(&renamed).await.unwrap() {
        OauthLogin::Existing(session) => {
            assert_eq!(service.decode(&session.token).unwrap(), "discord-42");
        }
        OauthLogin::New(_) => panic!("identity should be known"),
    }

    let session = service.register_oauth(&renamed, "프로게이머").await.unwrap();
    assert_eq!(session.user.user.display_name, "pro_gamer");
    assert_eq!(
        session.user.user.localized_name.as_deref(),
        Some("프로게이머")
    );
}

#[tokio::test]
async fn test_oauth_login_through_provider_client() {
    let (service, _pool) = helpers::test_service(AuthType::Both, helpers::relaxed_policy()).await;

    let provider = StubProvider {
        token: "valid-access-token",
        profile: ProviderProfile {
            external_id: "discord-7".to_string(),
            display_name: "gamer".to_string(),
            global_name: None,
        },
    };

    // Unknown identity comes back as New with the fetched profile.
    match service
        .oauth_login_with_token(&provider, "valid-access-token")
        .await
        .unwrap()
    {
        OauthLogin::New(profile) => assert_eq!(profile.external_id, "discord-7"),
        OauthLogin::Existing(_) => panic!("identity should be unknown"),
    }

    service.register_oauth(&provider.profile, "게이머").await.unwrap();
    match service
        .oauth_login_with_token(&provider, "valid-access-token")
        .await
        .unwrap()
    {
        OauthLogin::Existing(session) => {
            assert_eq!(session.user.user.external_id, "discord-7");
        }
        OauthLogin::New(_) => panic!("identity should be known"),
    }

    // Provider failures propagate; no session is minted.
    let err = service
        .oauth_login_with_token(&provider, "wrong-token")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExternalService);
}

#[tokio::test]
async fn test_authorize_with_token() {
    let (service, _pool) = helpers::test_service(AuthType::Both, helpers::relaxed_policy()).await;

    let session = service
        .register_local("admin", "Admin", "password", None)
        .await
        .unwrap();

    // No grants yet.
    assert!(!service.authorize(&session.token, Intent::View).await.unwrap());

    // Bogus tokens fail with InvalidToken, not false.
    let err = service.authorize("garbage", Intent::View).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidToken);
}
