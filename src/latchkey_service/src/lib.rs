mod auth_service;
mod helpers;
mod request_tracing;

pub use auth_service::{AuthService, AuthServiceConfig};
pub use helpers::{
    NotifierSetupError, configure_postgresql, configure_postmark_notifier, init_tracing,
};

// Re-export commonly used types
pub use latchkey_core::{Clock, CredentialStore, Notifier, PasswordHasher, TokenSigner};
