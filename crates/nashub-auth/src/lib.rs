//! # nashub-auth
//!
//! Authentication and authorization core for the Nashub NAS backend.
//!
//! ## Modules
//!
//! - `password`: Argon2id password hashing and policy enforcement
//! - `token`: bearer token creation and validation (HMAC JWT)
//! - `intent`: the intent (capability) permission evaluator
//! - `identity`: OAuth/local identity resolution and the [`AuthService`] facade
//! - `audit`: activity log recording

pub mod audit;
pub mod identity;
pub mod intent;
pub mod password;
pub mod token;

pub use audit::ActivityRecorder;
pub use identity::{AuthService, AuthSession, OauthLogin, ProviderClient};
pub use intent::IntentEvaluator;
pub use password::{PasswordHasher, PasswordValidator};
pub use token::{Claims, TokenDecoder, TokenEncoder};
