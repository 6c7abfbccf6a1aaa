use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

// Upper bound keeps hashing cost predictable for hostile inputs.
const MAX_PASSWORD_BYTES: usize = 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password is empty")]
    Empty,
    #[error("Password is too long")]
    TooLong,
}

/// A raw password as typed by the user.
///
/// Only the structural checks every password must pass live here. Strength
/// requirements belong to [`PasswordPolicy`](super::policy::PasswordPolicy)
/// and apply at registration only, so login can compare any candidate.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl Password {
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl TryFrom<Secret<String>> for Password {
    type Error = PasswordError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        let raw = value.expose_secret();
        if raw.is_empty() {
            return Err(PasswordError::Empty);
        }
        if raw.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong);
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for Password {
    type Error = PasswordError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(Secret::new(value.to_owned()))
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
