//! # Latchkey - Registration and Login Library
//!
//! Facade crate that re-exports the public APIs of the latchkey components:
//! two-step email registration (pre-register, then activate with a one-time
//! token) and password login issuing signed session tokens.
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `Password`, `User`, `ActivationToken`, policies
//! - **Ports**: `CredentialStore`, `Notifier`, `PasswordHasher`, `TokenSigner`, `Clock`
//! - **Use cases**: `PreRegisterUseCase`, `ActivateUseCase`, `LoginUseCase`
//! - **Adapters**: `PostgresCredentialStore`, `PostmarkNotifier`, `JwtTokenSigner`, etc.
//! - **Service**: `AuthService` - axum router mounted under `/api/auth`

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use latchkey_core::*;
}

pub use latchkey_core::{
    ActivationToken, ClaimsPolicy, Email, Password, PasswordPolicy, Profile, ProfileFields,
    RegistrationPolicy, SessionToken, User, UserId, UserStatus,
};

// ============================================================================
// Ports
// ============================================================================

pub use latchkey_core::{
    Clock, CredentialStore, CredentialStoreError, Notifier, NotifierError, PasswordHasher,
    PasswordHasherError, SystemClock, TokenSigner, TokenSignerError,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use latchkey_application::*;
}

pub use latchkey_application::{
    ActivateError, ActivateUseCase, ErrorKind, LoginError, LoginUseCase, PreRegisterError,
    PreRegisterRequest, PreRegisterUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// HTTP route handlers
    pub mod http {
        pub use latchkey_adapters::http::*;
    }

    /// Persistence implementations
    pub mod persistence {
        pub use latchkey_adapters::persistence::*;
    }

    /// Notifier implementations
    pub mod email {
        pub use latchkey_adapters::email::*;
    }

    /// Password hashing and session token signing
    pub mod auth {
        pub use latchkey_adapters::auth::*;
    }

    /// Configuration
    pub mod config {
        pub use latchkey_adapters::config::*;
    }
}

pub use latchkey_adapters::{
    Argon2PasswordHasher, HashMapCredentialStore, JwtTokenSigner, MockNotifier,
    PostgresCredentialStore, PostmarkNotifier,
};

// ============================================================================
// Auth Service (Main Entry Point)
// ============================================================================

pub use latchkey_service::{
    AuthService, AuthServiceConfig, configure_postgresql, configure_postmark_notifier,
};

/// Re-export async-trait for implementing the ports
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
