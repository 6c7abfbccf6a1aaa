use latchkey_core::{ActivationToken, Clock, CredentialStore, CredentialStoreError, UserId};
use secrecy::{ExposeSecret, Secret};

use crate::{
    deadline::{DeadlineExceeded, within},
    error_kind::ErrorKind,
};

/// Error types for activate use case
///
/// Token failures are reported precisely: holding a token already proves
/// intent, so there is nothing to hide from the caller.
#[derive(Debug, thiserror::Error)]
pub enum ActivateError {
    #[error("Activation token not found")]
    TokenNotFound,
    #[error("Activation token expired")]
    TokenExpired,
    #[error("Activation token already used")]
    TokenAlreadyUsed,
    #[error("Account is already active")]
    AlreadyActive,
    #[error("Credential store error: {0}")]
    CredentialStoreError(CredentialStoreError),
    #[error(transparent)]
    DeadlineExceeded(#[from] DeadlineExceeded),
}

impl From<CredentialStoreError> for ActivateError {
    fn from(error: CredentialStoreError) -> Self {
        match error {
            CredentialStoreError::TokenNotFound => ActivateError::TokenNotFound,
            CredentialStoreError::TokenExpired => ActivateError::TokenExpired,
            CredentialStoreError::TokenAlreadyUsed => ActivateError::TokenAlreadyUsed,
            CredentialStoreError::AlreadyActive => ActivateError::AlreadyActive,
            other => ActivateError::CredentialStoreError(other),
        }
    }
}

impl ActivateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ActivateError::TokenNotFound
            | ActivateError::TokenExpired
            | ActivateError::TokenAlreadyUsed
            | ActivateError::AlreadyActive => ErrorKind::Conflict,
            ActivateError::CredentialStoreError(_) => ErrorKind::Upstream,
            ActivateError::DeadlineExceeded(_) => ErrorKind::Timeout,
        }
    }
}

/// Activate use case - redeems an activation token
pub struct ActivateUseCase<S, C>
where
    S: CredentialStore,
    C: Clock,
{
    credential_store: S,
    clock: C,
}

impl<S, C> ActivateUseCase<S, C>
where
    S: CredentialStore,
    C: Clock,
{
    pub fn new(credential_store: S, clock: C) -> Self {
        Self {
            credential_store,
            clock,
        }
    }

    /// Execute the activate use case
    ///
    /// # Arguments
    /// * `raw_token` - The token from the activation message
    ///
    /// # Returns
    /// The id of the account that became active. Of several concurrent calls
    /// with the same token exactly one succeeds; the others get
    /// `TokenAlreadyUsed`.
    #[tracing::instrument(name = "ActivateUseCase::execute", skip_all)]
    pub async fn execute(&self, raw_token: Secret<String>) -> Result<UserId, ActivateError> {
        // A token we could never have issued cannot be in the store either
        let token = match ActivationToken::parse(raw_token.expose_secret()) {
            Ok(token) => token,
            Err(e) => {
                tracing::debug!(reason = %e, "Rejecting malformed activation token");
                return Err(ActivateError::TokenNotFound);
            }
        };

        let user_id = self
            .credential_store
            .consume_activation_token(&token, self.clock.now())
            .await
            .inspect_err(|e| tracing::debug!(error = %e, "Activation refused"))?;

        tracing::info!(%user_id, "Account activated");
        Ok(user_id)
    }

    /// Same as [`execute`](Self::execute), bounded by `deadline`.
    pub async fn execute_within(
        &self,
        deadline: std::time::Duration,
        raw_token: Secret<String>,
    ) -> Result<UserId, ActivateError> {
        within(deadline, self.execute(raw_token)).await
    }
}
