//! Tunable rules for registration and login.
//!
//! None of these are hard-coded in the flows; the service builds them from
//! configuration.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use super::{password::Password, session_token::SessionClaims};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("Password must be at least {0} characters")]
    TooShort(usize),
    #[error("Password must be at most {0} characters")]
    TooLong(usize),
    #[error("Password must contain a letter")]
    MissingLetter,
    #[error("Password must contain a digit")]
    MissingDigit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
    pub require_letter: bool,
    pub require_digit: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
            require_letter: true,
            require_digit: true,
        }
    }
}

impl PasswordPolicy {
    pub fn check(&self, password: &Password) -> Result<(), PolicyViolation> {
        let raw = password.expose();
        let length = raw.chars().count();

        if length < self.min_length {
            return Err(PolicyViolation::TooShort(self.min_length));
        }
        if length > self.max_length {
            return Err(PolicyViolation::TooLong(self.max_length));
        }
        if self.require_letter && !raw.chars().any(char::is_alphabetic) {
            return Err(PolicyViolation::MissingLetter);
        }
        if self.require_digit && !raw.chars().any(|c| c.is_ascii_digit()) {
            return Err(PolicyViolation::MissingDigit);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationPolicy {
    pub activation_ttl: Duration,
    /// When false, a second PreRegister for a pending email is refused
    /// instead of superseding the earlier registration.
    pub replace_pending: bool,
    pub password: PasswordPolicy,
}

impl Default for RegistrationPolicy {
    fn default() -> Self {
        Self {
            activation_ttl: Duration::hours(24),
            replace_pending: true,
            password: PasswordPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimsPolicy {
    pub ttl: Duration,
    pub role: String,
    pub issuer: String,
}

impl Default for ClaimsPolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::hours(1),
            role: "user".to_owned(),
            issuer: "latchkey".to_owned(),
        }
    }
}

impl ClaimsPolicy {
    pub fn claims_at(&self, now: DateTime<Utc>) -> SessionClaims {
        SessionClaims {
            role: self.role.clone(),
            issuer: self.issuer.clone(),
            issued_at: now,
            expires_at: now + self.ttl,
        }
    }
}
