use chrono::{DateTime, Utc};
use latchkey_core::{
    ActivationToken, CredentialStore, CredentialStoreError, Email, PasswordHash,
    PendingRegistration, Profile, User, UserId, UserStatus,
};
use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

const SELECT_USER_BY_EMAIL: &str = r#"
    SELECT id, email, password_hash, status, display_name, created_at, activated_at
    FROM users
    WHERE email = $1
"#;

const SELECT_USER_BY_ID: &str = r#"
    SELECT id, email, password_hash, status, display_name, created_at, activated_at
    FROM users
    WHERE id = $1
"#;

// Leaves active users untouched
const UPSERT_PENDING_USER: &str = r#"
    INSERT INTO users (id, email, password_hash, status, display_name, created_at)
    VALUES ($1, $2, $3, 'pending', $4, $5)
    ON CONFLICT (email) DO UPDATE
    SET password_hash = EXCLUDED.password_hash,
        display_name = EXCLUDED.display_name
    WHERE users.status = 'pending'
    RETURNING id
"#;

const INSERT_NEW_PENDING_USER: &str = r#"
    INSERT INTO users (id, email, password_hash, status, display_name, created_at)
    VALUES ($1, $2, $3, 'pending', $4, $5)
    ON CONFLICT (email) DO NOTHING
    RETURNING id
"#;

#[derive(Clone)]
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        PostgresCredentialStore { pool }
    }
}

fn unexpected(error: impl std::fmt::Display) -> CredentialStoreError {
    CredentialStoreError::UnexpectedError(error.to_string())
}

fn user_from_row(row: &PgRow) -> Result<User, CredentialStoreError> {
    let email: String = row.try_get("email").map_err(unexpected)?;
    let status: String = row.try_get("status").map_err(unexpected)?;

    Ok(User::restore(
        UserId::from(row.try_get::<Uuid, _>("id").map_err(unexpected)?),
        Email::try_from(Secret::from(email)).map_err(unexpected)?,
        PasswordHash::from_encoded(row.try_get("password_hash").map_err(unexpected)?),
        status.parse::<UserStatus>().map_err(unexpected)?,
        Profile::from_stored(row.try_get("display_name").map_err(unexpected)?),
        row.try_get("created_at").map_err(unexpected)?,
        row.try_get("activated_at").map_err(unexpected)?,
    ))
}

#[async_trait::async_trait]
impl CredentialStore for PostgresCredentialStore {
    #[tracing::instrument(name = "Retrieving user by email from PostgreSQL", skip_all)]
    async fn find_user_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<User>, CredentialStoreError> {
        let row = sqlx::query(SELECT_USER_BY_EMAIL)
            .bind(email.as_ref().expose_secret())
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        row.as_ref().map(user_from_row).transpose()
    }

    #[tracing::instrument(name = "Retrieving user by id from PostgreSQL", skip_all)]
    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, CredentialStoreError> {
        let row = sqlx::query(SELECT_USER_BY_ID)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        row.as_ref().map(user_from_row).transpose()
    }

    #[tracing::instrument(name = "Upserting pending user in PostgreSQL", skip_all)]
    async fn upsert_pending_user(
        &self,
        registration: PendingRegistration,
    ) -> Result<UserId, CredentialStoreError> {
        let candidate_id = UserId::new();
        let mut transaction = self.pool.begin().await.map_err(unexpected)?;

        // Both statements yield no row when the email is taken
        let statement = if registration.replace_pending {
            UPSERT_PENDING_USER
        } else {
            INSERT_NEW_PENDING_USER
        };
        let row = sqlx::query(statement)
            .bind(candidate_id.as_uuid())
            .bind(registration.email.as_ref().expose_secret())
            .bind(registration.password_hash.expose_encoded())
            .bind(registration.profile.display_name())
            .bind(registration.registered_at)
            .fetch_optional(&mut *transaction)
            .await
            .map_err(unexpected)?;

        let Some(row) = row else {
            return Err(CredentialStoreError::EmailTaken);
        };
        let user_id: Uuid = row.try_get("id").map_err(unexpected)?;

        sqlx::query("DELETE FROM activation_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *transaction)
            .await
            .map_err(unexpected)?;

        sqlx::query(
            r#"
                INSERT INTO activation_tokens (token, user_id, issued_at, expires_at, consumed)
                VALUES ($1, $2, $3, $4, FALSE)
            "#,
        )
        .bind(registration.token.as_str())
        .bind(user_id)
        .bind(registration.registered_at)
        .bind(registration.token_expires_at)
        .execute(&mut *transaction)
        .await
        .map_err(unexpected)?;

        transaction.commit().await.map_err(unexpected)?;

        Ok(UserId::from(user_id))
    }

    #[tracing::instrument(name = "Consuming activation token in PostgreSQL", skip_all)]
    async fn consume_activation_token(
        &self,
        token: &ActivationToken,
        now: DateTime<Utc>,
    ) -> Result<UserId, CredentialStoreError> {
        let mut transaction = self.pool.begin().await.map_err(unexpected)?;

        // Locks the token and its user until commit
        let row = sqlx::query(
            r#"
                SELECT t.user_id, t.expires_at, t.consumed, u.status
                FROM activation_tokens t
                JOIN users u ON u.id = t.user_id
                WHERE t.token = $1
                FOR UPDATE
            "#,
        )
        .bind(token.as_str())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(unexpected)?;

        let Some(row) = row else {
            return Err(CredentialStoreError::TokenNotFound);
        };

        let user_id: Uuid = row.try_get("user_id").map_err(unexpected)?;
        let expires_at: DateTime<Utc> = row.try_get("expires_at").map_err(unexpected)?;
        let consumed: bool = row.try_get("consumed").map_err(unexpected)?;
        let status: String = row.try_get("status").map_err(unexpected)?;

        if consumed {
            return Err(CredentialStoreError::TokenAlreadyUsed);
        }
        if status.parse::<UserStatus>().map_err(unexpected)? == UserStatus::Active {
            return Err(CredentialStoreError::AlreadyActive);
        }
        if now >= expires_at {
            sqlx::query("DELETE FROM activation_tokens WHERE token = $1")
                .bind(token.as_str())
                .execute(&mut *transaction)
                .await
                .map_err(unexpected)?;
            transaction.commit().await.map_err(unexpected)?;
            return Err(CredentialStoreError::TokenExpired);
        }

        sqlx::query("UPDATE activation_tokens SET consumed = TRUE WHERE token = $1")
            .bind(token.as_str())
            .execute(&mut *transaction)
            .await
            .map_err(unexpected)?;

        sqlx::query("UPDATE users SET status = 'active', activated_at = $2 WHERE id = $1")
            .bind(user_id)
            .bind(now)
            .execute(&mut *transaction)
            .await
            .map_err(unexpected)?;

        transaction.commit().await.map_err(unexpected)?;

        Ok(UserId::from(user_id))
    }
}
