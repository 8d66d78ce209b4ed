//! User entity and related types.

pub mod auth_kind;
pub mod model;

pub use auth_kind::AuthKind;
pub use model::{CreateLocalUser, ProviderProfile, User, UserWithIntents};
