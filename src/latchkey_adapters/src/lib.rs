pub mod auth;
pub mod config;
pub mod email;
pub mod http;
pub mod persistence;

pub use auth::{Argon2PasswordHasher, JwtTokenSigner, SessionTokenClaims};
pub use email::{MockNotifier, PostmarkNotifier};
pub use persistence::{HashMapCredentialStore, PostgresCredentialStore};
