use std::fmt;

use chrono::{DateTime, Utc};
use rand::{Rng, distr::Alphanumeric};
use thiserror::Error;

use super::user::UserId;

const TOKEN_LENGTH: usize = 48;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActivationTokenError {
    #[error("Activation token has the wrong length")]
    InvalidLength,
    #[error("Activation token contains invalid characters")]
    InvalidCharacters,
}

/// Opaque single-use value proving ownership of a registration email.
///
/// 48 alphanumeric characters drawn from the thread-local CSPRNG, which gives
/// a little over 285 bits of entropy.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ActivationToken(String);

impl ActivationToken {
    pub fn generate() -> Self {
        let value = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();
        Self(value)
    }

    pub fn parse(raw: &str) -> Result<Self, ActivationTokenError> {
        let raw = raw.trim();
        if raw.len() != TOKEN_LENGTH {
            return Err(ActivationTokenError::InvalidLength);
        }
        if !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ActivationTokenError::InvalidCharacters);
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens end up in logs through `Debug` on error paths; print a prefix only.
impl fmt::Debug for ActivationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "ActivationToken({prefix}…)")
    }
}

/// A persisted activation token row, bound to exactly one user.
#[derive(Debug, Clone)]
pub struct IssuedActivationToken {
    pub token: ActivationToken,
    pub user_id: UserId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub consumed: bool,
}

impl IssuedActivationToken {
    /// A token is expired from `expires_at` onwards.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
