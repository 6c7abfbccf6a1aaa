pub mod clock;
pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use clock::{Clock, SystemClock};

#[cfg(any(test, feature = "testing"))]
pub use clock::ManualClock;

pub use domain::{
    activation_token::{ActivationToken, ActivationTokenError, IssuedActivationToken},
    email::{Email, EmailError},
    password::{Password, PasswordError},
    password_hash::PasswordHash,
    policy::{ClaimsPolicy, PasswordPolicy, PolicyViolation, RegistrationPolicy},
    profile::{Profile, ProfileError, ProfileFields},
    session_token::{SessionClaims, SessionToken},
    user::{AlreadyActive, UnknownStatus, User, UserId, UserStatus},
};

pub use ports::{
    repositories::{CredentialStore, CredentialStoreError, PendingRegistration},
    services::{
        Notifier, NotifierError, PasswordHasher, PasswordHasherError, TokenSigner,
        TokenSignerError,
    },
};
