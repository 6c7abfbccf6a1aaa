//! Test doubles shared by the use case tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use latchkey_core::{
    ActivationToken, CredentialStore, CredentialStoreError, Email, IssuedActivationToken,
    Notifier, NotifierError, Password, PasswordHash, PasswordHasher, PasswordHasherError,
    PendingRegistration, SessionClaims, SessionToken, TokenSigner, TokenSignerError, User, UserId,
};
use tokio::sync::{RwLock, RwLockWriteGuard};

#[derive(Default)]
struct StoreState {
    users: HashMap<UserId, User>,
    tokens: HashMap<ActivationToken, IssuedActivationToken>,
    calls: usize,
}

#[derive(Clone, Default)]
pub struct MockCredentialStore {
    state: Arc<RwLock<StoreState>>,
    unavailable: bool,
}

impl MockCredentialStore {
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub async fn call_count(&self) -> usize {
        self.state.read().await.calls
    }

    pub async fn token_for(&self, user_id: &UserId) -> Option<ActivationToken> {
        self.state
            .read()
            .await
            .tokens
            .values()
            .find(|t| t.user_id == *user_id && !t.consumed)
            .map(|t| t.token.clone())
    }

    pub async fn force_activate(&self, user_id: &UserId) {
        let mut state = self.state.write().await;
        if let Some(user) = state.users.get_mut(user_id) {
            user.activate(Utc::now()).unwrap();
        }
    }

    async fn begin(&self) -> Result<RwLockWriteGuard<'_, StoreState>, CredentialStoreError> {
        let mut state = self.state.write().await;
        state.calls += 1;
        if self.unavailable {
            return Err(CredentialStoreError::UnexpectedError(
                "connection refused".to_string(),
            ));
        }
        Ok(state)
    }
}

#[async_trait::async_trait]
impl CredentialStore for MockCredentialStore {
    async fn find_user_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<User>, CredentialStoreError> {
        let state = self.begin().await?;
        Ok(state.users.values().find(|u| u.email() == email).cloned())
    }

    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, CredentialStoreError> {
        let state = self.begin().await?;
        Ok(state.users.get(id).cloned())
    }

    async fn upsert_pending_user(
        &self,
        registration: PendingRegistration,
    ) -> Result<UserId, CredentialStoreError> {
        let mut state = self.begin().await?;

        let existing = state
            .users
            .values()
            .find(|u| u.email() == &registration.email)
            .map(User::id);

        let user_id = match existing {
            Some(_) if !registration.replace_pending => {
                return Err(CredentialStoreError::EmailTaken);
            }
            Some(id) => {
                let user = state
                    .users
                    .get_mut(&id)
                    .ok_or(CredentialStoreError::UnexpectedError("lost user".into()))?;
                user.supersede(registration.password_hash, registration.profile)
                    .map_err(|_| CredentialStoreError::EmailTaken)?;
                id
            }
            None => {
                let user = User::pending(
                    registration.email,
                    registration.password_hash,
                    registration.profile,
                    registration.registered_at,
                );
                let id = user.id();
                state.users.insert(id, user);
                id
            }
        };

        state.tokens.retain(|_, t| t.user_id != user_id);
        state.tokens.insert(
            registration.token.clone(),
            IssuedActivationToken {
                token: registration.token,
                user_id,
                issued_at: registration.registered_at,
                expires_at: registration.token_expires_at,
                consumed: false,
            },
        );

        Ok(user_id)
    }

    async fn consume_activation_token(
        &self,
        token: &ActivationToken,
        now: DateTime<Utc>,
    ) -> Result<UserId, CredentialStoreError> {
        let mut state = self.begin().await?;
        let state = &mut *state;

        let issued = state
            .tokens
            .get_mut(token)
            .ok_or(CredentialStoreError::TokenNotFound)?;
        if issued.consumed {
            return Err(CredentialStoreError::TokenAlreadyUsed);
        }
        let user = state
            .users
            .get_mut(&issued.user_id)
            .ok_or(CredentialStoreError::TokenNotFound)?;
        if user.is_active() {
            return Err(CredentialStoreError::AlreadyActive);
        }
        if issued.is_expired_at(now) {
            state.tokens.remove(token);
            return Err(CredentialStoreError::TokenExpired);
        }

        issued.consumed = true;
        user.activate(now)
            .map_err(|_| CredentialStoreError::AlreadyActive)?;
        Ok(user.id())
    }
}

#[derive(Clone, Default)]
pub struct MockNotifier {
    deliveries: Arc<RwLock<Vec<(Email, ActivationToken)>>>,
    failing: Arc<RwLock<bool>>,
    delay: Option<Duration>,
}

impl MockNotifier {
    pub fn failing() -> Self {
        Self {
            failing: Arc::new(RwLock::new(true)),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    pub async fn deliveries(&self) -> Vec<(Email, ActivationToken)> {
        self.deliveries.read().await.clone()
    }

    pub async fn last_token(&self) -> ActivationToken {
        self.deliveries
            .read()
            .await
            .last()
            .map(|(_, token)| token.clone())
            .expect("no activation message was sent")
    }
}

#[async_trait::async_trait]
impl Notifier for MockNotifier {
    async fn send_activation(
        &self,
        destination: &Email,
        token: &ActivationToken,
    ) -> Result<(), NotifierError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if *self.failing.read().await {
            return Err(NotifierError("mail relay unreachable".to_string()));
        }
        self.deliveries
            .write()
            .await
            .push((destination.clone(), token.clone()));
        Ok(())
    }
}

/// Reversible stand-in for Argon2 so tests stay fast.
#[derive(Clone, Copy, Default)]
pub struct PlainHasher;

#[async_trait::async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError> {
        Ok(PasswordHash::from_encoded(format!("plain${}", password.expose())))
    }

    async fn verify(
        &self,
        candidate: &Password,
        expected: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        Ok(expected.expose_encoded() == format!("plain${}", candidate.expose()))
    }
}

#[derive(Clone, Default)]
pub struct MockSigner {
    pub failing: bool,
}

#[async_trait::async_trait]
impl TokenSigner for MockSigner {
    async fn issue(
        &self,
        user_id: &UserId,
        claims: &SessionClaims,
    ) -> Result<SessionToken, TokenSignerError> {
        if self.failing {
            return Err(TokenSignerError("signing key unavailable".to_string()));
        }
        Ok(SessionToken(format!(
            "signed.{user_id}.{}.{}",
            claims.role,
            claims.expires_at.timestamp()
        )))
    }
}
