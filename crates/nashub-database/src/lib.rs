//! # nashub-database
//!
//! SQLite connection management, schema migrations, and repository
//! implementations for the credential store and activity log.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
