use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{email::Email, password_hash::PasswordHash, profile::Profile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Pending,
    Active,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Pending => "pending",
            UserStatus::Active => "active",
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown user status: {0}")]
pub struct UnknownStatus(String);

impl FromStr for UserStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(UserStatus::Pending),
            "active" => Ok(UserStatus::Active),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("User is already active")]
pub struct AlreadyActive;

/// A registered identity.
///
/// Only credential stores construct and mutate users; the flows read them
/// through the store interface. The password hash stays inside the record.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    email: Email,
    password_hash: PasswordHash,
    status: UserStatus,
    profile: Profile,
    created_at: DateTime<Utc>,
    activated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn pending(
        email: Email,
        password_hash: PasswordHash,
        profile: Profile,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            email,
            password_hash,
            status: UserStatus::Pending,
            profile,
            created_at,
            activated_at: None,
        }
    }

    /// Rebuild a user from persisted columns.
    pub fn restore(
        id: UserId,
        email: Email,
        password_hash: PasswordHash,
        status: UserStatus,
        profile: Profile,
        created_at: DateTime<Utc>,
        activated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            status,
            profile,
            created_at,
            activated_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn activated_at(&self) -> Option<DateTime<Utc>> {
        self.activated_at
    }

    /// Replace the credentials of a pending registration.
    pub fn supersede(
        &mut self,
        password_hash: PasswordHash,
        profile: Profile,
    ) -> Result<(), AlreadyActive> {
        if self.is_active() {
            return Err(AlreadyActive);
        }
        self.password_hash = password_hash;
        self.profile = profile;
        Ok(())
    }

    /// Pending -> Active. The transition happens once and never reverses.
    pub fn activate(&mut self, at: DateTime<Utc>) -> Result<(), AlreadyActive> {
        if self.is_active() {
            return Err(AlreadyActive);
        }
        self.status = UserStatus::Active;
        self.activated_at = Some(at);
        Ok(())
    }
}
