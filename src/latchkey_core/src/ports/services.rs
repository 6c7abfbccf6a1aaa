use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    activation_token::ActivationToken,
    email::Email,
    password::Password,
    password_hash::PasswordHash,
    session_token::{SessionClaims, SessionToken},
    user::UserId,
};

#[derive(Debug, Error)]
#[error("Failed to deliver activation message: {0}")]
pub struct NotifierError(pub String);

/// Port trait for delivering activation messages
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_activation(
        &self,
        destination: &Email,
        token: &ActivationToken,
    ) -> Result<(), NotifierError>;
}

#[derive(Debug, Error)]
#[error("Failed to issue session token: {0}")]
pub struct TokenSignerError(pub String);

/// Port trait for building signed session tokens
#[async_trait]
pub trait TokenSigner: Send + Sync {
    async fn issue(
        &self,
        user_id: &UserId,
        claims: &SessionClaims,
    ) -> Result<SessionToken, TokenSignerError>;
}

#[derive(Debug, Error)]
#[error("Password hashing failed: {0}")]
pub struct PasswordHasherError(pub String);

/// Port trait for salted, slow one-way password hashing
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError>;

    /// Constant-time comparison of `candidate` against `expected`.
    ///
    /// `Ok(false)` means the password is wrong; `Err` means the hash could
    /// not be evaluated at all.
    async fn verify(
        &self,
        candidate: &Password,
        expected: &PasswordHash,
    ) -> Result<bool, PasswordHasherError>;
}
