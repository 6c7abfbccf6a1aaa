use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    activation_token::ActivationToken,
    email::Email,
    password_hash::PasswordHash,
    profile::Profile,
    user::{User, UserId},
};

// CredentialStore port trait and errors
#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("Email is already registered")]
    EmailTaken,
    #[error("Activation token not found")]
    TokenNotFound,
    #[error("Activation token expired")]
    TokenExpired,
    #[error("Activation token already used")]
    TokenAlreadyUsed,
    #[error("User is already active")]
    AlreadyActive,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for CredentialStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::EmailTaken, Self::EmailTaken) => true,
            (Self::TokenNotFound, Self::TokenNotFound) => true,
            (Self::TokenExpired, Self::TokenExpired) => true,
            (Self::TokenAlreadyUsed, Self::TokenAlreadyUsed) => true,
            (Self::AlreadyActive, Self::AlreadyActive) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

/// Everything needed to write a pending user and its activation token.
#[derive(Debug, Clone)]
pub struct PendingRegistration {
    pub email: Email,
    pub password_hash: PasswordHash,
    pub profile: Profile,
    pub registered_at: DateTime<Utc>,
    pub token: ActivationToken,
    pub token_expires_at: DateTime<Utc>,
    /// When false an existing pending user with the same email is left alone
    /// and the write fails with `EmailTaken`.
    pub replace_pending: bool,
}

/// Persistence for users and their activation tokens.
///
/// Implementations must make `upsert_pending_user` and
/// `consume_activation_token` atomic: a concurrent reader sees either the
/// state before the call or the state after it.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_user_by_email(&self, email: &Email)
        -> Result<Option<User>, CredentialStoreError>;

    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, CredentialStoreError>;

    /// Insert a pending user, or overwrite the existing pending user with the
    /// same email, and make `registration.token` its only activation token.
    ///
    /// Fails with `EmailTaken` when the email belongs to an active user, or to
    /// a pending one and `registration.replace_pending` is false. The check
    /// and the write are one atomic step.
    /// Returns the id of the pending user, which is stable across overwrites.
    async fn upsert_pending_user(
        &self,
        registration: PendingRegistration,
    ) -> Result<UserId, CredentialStoreError>;

    /// Mark the token consumed and its user active in one step.
    ///
    /// Checks run in order: unknown token (`TokenNotFound`), consumed token
    /// (`TokenAlreadyUsed`), active user (`AlreadyActive`), expired token
    /// (`TokenExpired`, and the token is deleted).
    async fn consume_activation_token(
        &self,
        token: &ActivationToken,
        now: DateTime<Utc>,
    ) -> Result<UserId, CredentialStoreError>;
}
