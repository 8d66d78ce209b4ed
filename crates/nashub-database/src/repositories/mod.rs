//! Repository implementations over the SQLite credential store.
//!
//! Every call reads through to the backing store; there is no caching
//! layer. Each statement is individually atomic, but read-then-write
//! sequences are not wrapped in transactions; the unique constraint on
//! `users.external_id` arbitrates concurrent first-login races.

pub mod activity;
pub mod intent;
pub mod user;

pub use activity::ActivityRepository;
pub use intent::IntentRepository;
pub use user::UserRepository;
