//! Identity resolution: OAuth provider clients and the [`AuthService`]
//! facade exposed to the HTTP layer.

pub mod discord;
pub mod kakao;
pub mod provider;
pub mod service;

pub use discord::DiscordProvider;
pub use kakao::KakaoProvider;
pub use provider::ProviderClient;
pub use service::{AuthService, AuthSession, OauthLogin};
