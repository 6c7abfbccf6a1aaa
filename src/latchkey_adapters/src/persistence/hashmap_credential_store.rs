use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use latchkey_core::{
    ActivationToken, CredentialStore, CredentialStoreError, Email, IssuedActivationToken,
    PendingRegistration, User, UserId,
};
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    user_ids_by_email: HashMap<Email, UserId>,
    tokens: HashMap<ActivationToken, IssuedActivationToken>,
}

/// In-memory store. Both tables sit behind one lock so every write is atomic.
#[derive(Default, Clone)]
pub struct HashMapCredentialStore {
    tables: Arc<RwLock<Tables>>,
}

impl HashMapCredentialStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
        }
    }
}

#[async_trait::async_trait]
impl CredentialStore for HashMapCredentialStore {
    async fn find_user_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<User>, CredentialStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .user_ids_by_email
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, CredentialStoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(id).cloned())
    }

    async fn upsert_pending_user(
        &self,
        registration: PendingRegistration,
    ) -> Result<UserId, CredentialStoreError> {
        let mut tables = self.tables.write().await;
        let tables = &mut *tables;

        let user_id = match tables.user_ids_by_email.get(&registration.email) {
            Some(_) if !registration.replace_pending => {
                return Err(CredentialStoreError::EmailTaken);
            }
            Some(id) => {
                let user = tables.users.get_mut(id).ok_or_else(|| {
                    CredentialStoreError::UnexpectedError("email index out of sync".into())
                })?;
                user.supersede(registration.password_hash, registration.profile)
                    .map_err(|_| CredentialStoreError::EmailTaken)?;
                *id
            }
            None => {
                let user = User::pending(
                    registration.email.clone(),
                    registration.password_hash,
                    registration.profile,
                    registration.registered_at,
                );
                let id = user.id();
                tables.user_ids_by_email.insert(registration.email, id);
                tables.users.insert(id, user);
                id
            }
        };

        tables.tokens.retain(|_, issued| issued.user_id != user_id);
        tables.tokens.insert(
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
        let mut tables = self.tables.write().await;
        let tables = &mut *tables;

        let issued = tables
            .tokens
            .get_mut(token)
            .ok_or(CredentialStoreError::TokenNotFound)?;
        if issued.consumed {
            return Err(CredentialStoreError::TokenAlreadyUsed);
        }

        let user = tables
            .users
            .get_mut(&issued.user_id)
            .ok_or(CredentialStoreError::TokenNotFound)?;
        if user.is_active() {
            return Err(CredentialStoreError::AlreadyActive);
        }

        if issued.is_expired_at(now) {
            tables.tokens.remove(token);
            return Err(CredentialStoreError::TokenExpired);
        }

        user.activate(now)
            .map_err(|_| CredentialStoreError::AlreadyActive)?;
        issued.consumed = true;
        Ok(user.id())
    }
}
