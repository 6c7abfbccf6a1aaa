use latchkey_core::{
    ClaimsPolicy, Clock, CredentialStore, CredentialStoreError, Email, Password, PasswordHash,
    PasswordHasher, PasswordHasherError, SessionToken, TokenSigner, TokenSignerError,
};
use secrecy::Secret;
use tokio::sync::OnceCell;

use crate::{
    deadline::{DeadlineExceeded, within},
    error_kind::ErrorKind,
};

/// Error types specific to login use case
///
/// Unknown email, pending account and wrong password all collapse into
/// `InvalidCredentials`.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Credential store error: {0}")]
    CredentialStoreError(#[from] CredentialStoreError),
    #[error("Password hasher error: {0}")]
    PasswordHasherError(#[from] PasswordHasherError),
    #[error("Token signer error: {0}")]
    TokenSignerError(#[from] TokenSignerError),
    #[error(transparent)]
    DeadlineExceeded(#[from] DeadlineExceeded),
}

impl LoginError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoginError::InvalidInput(_) => ErrorKind::Input,
            LoginError::InvalidCredentials => ErrorKind::Unauthorized,
            LoginError::CredentialStoreError(_)
            | LoginError::PasswordHasherError(_)
            | LoginError::TokenSignerError(_) => ErrorKind::Upstream,
            LoginError::DeadlineExceeded(_) => ErrorKind::Timeout,
        }
    }
}

// Verified against when the email is unknown so every login pays one hash.
const DECOY_PASSWORD: &str = "latchkey-decoy-password";

/// Login use case - verifies credentials and issues a session token
pub struct LoginUseCase<S, H, T, C>
where
    S: CredentialStore,
    H: PasswordHasher,
    T: TokenSigner,
    C: Clock,
{
    credential_store: S,
    password_hasher: H,
    token_signer: T,
    clock: C,
    claims_policy: ClaimsPolicy,
    decoy_hash: OnceCell<PasswordHash>,
}

impl<S, H, T, C> LoginUseCase<S, H, T, C>
where
    S: CredentialStore,
    H: PasswordHasher,
    T: TokenSigner,
    C: Clock,
{
    pub fn new(
        credential_store: S,
        password_hasher: H,
        token_signer: T,
        clock: C,
        claims_policy: ClaimsPolicy,
    ) -> Self {
        Self {
            credential_store,
            password_hasher,
            token_signer,
            clock,
            claims_policy,
            decoy_hash: OnceCell::new(),
        }
    }

    /// Execute the login use case
    ///
    /// # Arguments
    /// * `email` - User's email address, normalized before lookup
    /// * `password` - User's password
    ///
    /// # Returns
    /// A signed session token for an active account. No session state is
    /// stored.
    #[tracing::instrument(name = "LoginUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        email: Secret<String>,
        password: Secret<String>,
    ) -> Result<SessionToken, LoginError> {
        let email =
            Email::try_from(email).map_err(|e| LoginError::InvalidInput(e.to_string()))?;
        let password =
            Password::try_from(password).map_err(|e| LoginError::InvalidInput(e.to_string()))?;

        let Some(user) = self.credential_store.find_user_by_email(&email).await? else {
            let decoy = self.decoy_hash().await?;
            self.password_hasher.verify(&password, decoy).await?;
            tracing::debug!("Login refused: unknown email");
            return Err(LoginError::InvalidCredentials);
        };

        let password_matches = self
            .password_hasher
            .verify(&password, user.password_hash())
            .await?;

        if !user.is_active() {
            tracing::debug!(user_id = %user.id(), "Login refused: account not activated");
            return Err(LoginError::InvalidCredentials);
        }
        if !password_matches {
            tracing::debug!(user_id = %user.id(), "Login refused: wrong password");
            return Err(LoginError::InvalidCredentials);
        }

        let claims = self.claims_policy.claims_at(self.clock.now());
        let token = self.token_signer.issue(&user.id(), &claims).await?;

        tracing::info!(user_id = %user.id(), "Session token issued");
        Ok(token)
    }

    /// Same as [`execute`](Self::execute), bounded by `deadline`.
    pub async fn execute_within(
        &self,
        deadline: std::time::Duration,
        email: Secret<String>,
        password: Secret<String>,
    ) -> Result<SessionToken, LoginError> {
        within(deadline, self.execute(email, password)).await
    }

    async fn decoy_hash(&self) -> Result<&PasswordHash, PasswordHasherError> {
        self.decoy_hash
            .get_or_try_init(|| async {
                let decoy = Password::try_from(DECOY_PASSWORD)
                    .map_err(|e| PasswordHasherError(e.to_string()))?;
                self.password_hasher.hash(&decoy).await
            })
            .await
    }
}
