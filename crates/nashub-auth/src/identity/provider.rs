//! The OAuth provider seam.

use async_trait::async_trait;

use nashub_core::result::AppResult;
use nashub_entity::user::ProviderProfile;

/// An external OAuth provider's identity endpoint.
///
/// Implementations exchange a provider access token for the stable
/// identity and profile fields of the authenticated user. The trait
/// exists so the identity resolver stays testable without network
/// access.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Fetch the authenticated user's profile for the given provider
    /// access token.
    async fn fetch_profile(&self, access_token: &str) -> AppResult<ProviderProfile>;
}
