//! # nashub-entity
//!
//! Domain entity models for Nashub: users, intent grants, and the
//! activity log.

pub mod activity;
pub mod intent;
pub mod user;

pub use activity::{ActivityEntry, ActivityLog};
pub use intent::Intent;
pub use user::{AuthKind, CreateLocalUser, ProviderProfile, User, UserWithIntents};
