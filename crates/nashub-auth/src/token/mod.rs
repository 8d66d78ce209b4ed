//! Bearer token creation and validation.
//!
//! Tokens are HS256 JWTs signed with a process-wide secret that is loaded
//! from configuration at startup and never rotated at runtime. The same
//! secret both signs and verifies.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::Claims;
pub use decoder::TokenDecoder;
pub use encoder::{IssuedToken, TokenEncoder};
