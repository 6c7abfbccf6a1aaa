use chrono::{DateTime, Utc};
use latchkey_core::{
    ActivationToken, Clock, CredentialStore, CredentialStoreError, Email, Notifier,
    NotifierError, Password, PasswordHasher, PasswordHasherError, PendingRegistration, Profile,
    ProfileFields, RegistrationPolicy, UserId,
};
use secrecy::Secret;

use crate::{
    deadline::{DeadlineExceeded, within},
    error_kind::ErrorKind,
};

/// Raw registration input as received from the boundary
#[derive(Debug)]
pub struct PreRegisterRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
    pub profile: ProfileFields,
}

/// Response from pre-register use case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationSent {
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

/// Error types specific to pre-register use case
#[derive(Debug, thiserror::Error)]
pub enum PreRegisterError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Email is already registered")]
    EmailTaken,
    /// The pending account was stored; only the message is missing.
    #[error("Account {user_id} created but activation message failed: {source}")]
    NotifyFailed {
        user_id: UserId,
        #[source]
        source: NotifierError,
    },
    #[error("Credential store error: {0}")]
    CredentialStoreError(CredentialStoreError),
    #[error("Password hasher error: {0}")]
    PasswordHasherError(#[from] PasswordHasherError),
    #[error(transparent)]
    DeadlineExceeded(#[from] DeadlineExceeded),
}

impl From<CredentialStoreError> for PreRegisterError {
    fn from(error: CredentialStoreError) -> Self {
        match error {
            CredentialStoreError::EmailTaken => PreRegisterError::EmailTaken,
            other => PreRegisterError::CredentialStoreError(other),
        }
    }
}

impl PreRegisterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PreRegisterError::InvalidInput(_) => ErrorKind::Input,
            PreRegisterError::EmailTaken => ErrorKind::Conflict,
            PreRegisterError::NotifyFailed { .. } => ErrorKind::NotifyFailed,
            PreRegisterError::CredentialStoreError(_)
            | PreRegisterError::PasswordHasherError(_) => ErrorKind::Upstream,
            PreRegisterError::DeadlineExceeded(_) => ErrorKind::Timeout,
        }
    }
}

/// Pre-register use case - stores a pending account and sends its activation token
pub struct PreRegisterUseCase<S, N, H, C>
where
    S: CredentialStore,
    N: Notifier,
    H: PasswordHasher,
    C: Clock,
{
    credential_store: S,
    notifier: N,
    password_hasher: H,
    clock: C,
    policy: RegistrationPolicy,
}

impl<S, N, H, C> PreRegisterUseCase<S, N, H, C>
where
    S: CredentialStore,
    N: Notifier,
    H: PasswordHasher,
    C: Clock,
{
    pub fn new(
        credential_store: S,
        notifier: N,
        password_hasher: H,
        clock: C,
        policy: RegistrationPolicy,
    ) -> Self {
        Self {
            credential_store,
            notifier,
            password_hasher,
            clock,
            policy,
        }
    }

    /// Execute the pre-register use case
    ///
    /// A repeat call for an email that is still pending replaces the earlier
    /// registration and its token, which is also how a lost activation email
    /// gets resent.
    ///
    /// # Partial success
    /// When the notifier fails the pending account is kept and
    /// `PreRegisterError::NotifyFailed` is returned. Callers should offer a
    /// retry, which issues a fresh token.
    #[tracing::instrument(name = "PreRegisterUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        request: PreRegisterRequest,
    ) -> Result<ActivationSent, PreRegisterError> {
        // Reject malformed input before touching any collaborator
        let email = Email::try_from(request.email)
            .map_err(|e| PreRegisterError::InvalidInput(e.to_string()))?;
        let password = Password::try_from(request.password)
            .map_err(|e| PreRegisterError::InvalidInput(e.to_string()))?;
        self.policy
            .password
            .check(&password)
            .map_err(|e| PreRegisterError::InvalidInput(e.to_string()))?;
        let profile = Profile::try_from(request.profile)
            .map_err(|e| PreRegisterError::InvalidInput(e.to_string()))?;

        if let Some(existing) = self.credential_store.find_user_by_email(&email).await? {
            if existing.is_active() || !self.policy.replace_pending {
                return Err(PreRegisterError::EmailTaken);
            }
            tracing::debug!(user_id = %existing.id(), "Superseding pending registration");
        }

        let password_hash = self.password_hasher.hash(&password).await?;

        let now = self.clock.now();
        let token = ActivationToken::generate();
        let expires_at = now + self.policy.activation_ttl;

        // The lookup above is only a fast path. The store repeats both checks
        // atomically, so a concurrent activation or registration still yields
        // EmailTaken.
        let user_id = self
            .credential_store
            .upsert_pending_user(PendingRegistration {
                email: email.clone(),
                password_hash,
                profile,
                registered_at: now,
                token: token.clone(),
                token_expires_at: expires_at,
                replace_pending: self.policy.replace_pending,
            })
            .await?;

        if let Err(source) = self.notifier.send_activation(&email, &token).await {
            tracing::warn!(
                %user_id,
                error = %source,
                "Activation message not delivered, pending account kept"
            );
            return Err(PreRegisterError::NotifyFailed { user_id, source });
        }

        tracing::info!(%user_id, "Activation message sent");
        Ok(ActivationSent {
            user_id,
            expires_at,
        })
    }

    /// Same as [`execute`](Self::execute), bounded by `deadline`.
    pub async fn execute_within(
        &self,
        deadline: std::time::Duration,
        request: PreRegisterRequest,
    ) -> Result<ActivationSent, PreRegisterError> {
        within(deadline, self.execute(request)).await
    }
}
