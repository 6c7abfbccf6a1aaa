use argon2::{
    Algorithm, Argon2, Params, PasswordHash as EncodedHash, PasswordVerifier, Version,
    password_hash::{self, PasswordHasher as _, SaltString, rand_core},
};
use latchkey_core::{Password, PasswordHash, PasswordHasher, PasswordHasherError};

/// Argon2id hasher. Hashing and verification run on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

fn argon2() -> Result<Argon2<'static>, PasswordHasherError> {
    let params =
        Params::new(15000, 2, 1, None).map_err(|e| PasswordHasherError(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

#[async_trait::async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    #[tracing::instrument(name = "Computing password hash", skip_all)]
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError> {
        let password = password.clone();
        let current_span: tracing::Span = tracing::Span::current();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| {
                let salt = SaltString::generate(rand_core::OsRng);
                argon2()?
                    .hash_password(password.expose().as_bytes(), &salt)
                    .map(|hash| PasswordHash::from_encoded(hash.to_string()))
                    .map_err(|e| PasswordHasherError(e.to_string()))
            })
        })
        .await
        .map_err(|e| PasswordHasherError(e.to_string()))?
    }

    #[tracing::instrument(name = "Verify password hash", skip_all)]
    async fn verify(
        &self,
        candidate: &Password,
        expected: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let candidate = candidate.clone();
        let expected = expected.clone();
        let current_span: tracing::Span = tracing::Span::current();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| {
                let expected = EncodedHash::new(expected.expose_encoded())
                    .map_err(|e| PasswordHasherError(e.to_string()))?;

                match argon2()?.verify_password(candidate.expose().as_bytes(), &expected) {
                    Ok(()) => Ok(true),
                    Err(password_hash::Error::Password) => Ok(false),
                    Err(e) => Err(PasswordHasherError(e.to_string())),
                }
            })
        })
        .await
        .map_err(|e| PasswordHasherError(e.to_string()))?
    }
}
