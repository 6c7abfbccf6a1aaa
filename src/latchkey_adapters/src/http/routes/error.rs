use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use latchkey_application::{ActivateError, LoginError, PreRegisterError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AuthApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Email is already registered")]
    EmailTaken,

    #[error("Activation token not found")]
    TokenNotFound,

    #[error("Activation token expired")]
    TokenExpired,

    #[error("Activation token already used")]
    TokenAlreadyUsed,

    #[error("Account is already active")]
    AlreadyActive,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(
        "Account created but the activation email could not be sent; register again to resend it"
    )]
    NotifyFailed,

    #[error("Service temporarily unavailable")]
    Upstream(String),

    #[error("Request timed out")]
    DeadlineExceeded,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            AuthApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,

            AuthApiError::EmailTaken
            | AuthApiError::TokenAlreadyUsed
            | AuthApiError::AlreadyActive => StatusCode::CONFLICT,

            AuthApiError::TokenNotFound => StatusCode::NOT_FOUND,
            AuthApiError::TokenExpired => StatusCode::GONE,
            AuthApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthApiError::NotifyFailed => StatusCode::BAD_GATEWAY,

            AuthApiError::Upstream(detail) => {
                tracing::error!(error = %detail, "Dependency failure");
                StatusCode::SERVICE_UNAVAILABLE
            }

            AuthApiError::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status_code, body).into_response()
    }
}

impl From<JsonRejection> for AuthApiError {
    fn from(rejection: JsonRejection) -> Self {
        AuthApiError::InvalidInput(rejection.body_text())
    }
}

impl From<PreRegisterError> for AuthApiError {
    fn from(error: PreRegisterError) -> Self {
        match error {
            PreRegisterError::InvalidInput(e) => AuthApiError::InvalidInput(e),
            PreRegisterError::EmailTaken => AuthApiError::EmailTaken,
            PreRegisterError::NotifyFailed { .. } => AuthApiError::NotifyFailed,
            PreRegisterError::CredentialStoreError(e) => AuthApiError::Upstream(e.to_string()),
            PreRegisterError::PasswordHasherError(e) => AuthApiError::Upstream(e.to_string()),
            PreRegisterError::DeadlineExceeded(_) => AuthApiError::DeadlineExceeded,
        }
    }
}

impl From<ActivateError> for AuthApiError {
    fn from(error: ActivateError) -> Self {
        match error {
            ActivateError::TokenNotFound => AuthApiError::TokenNotFound,
            ActivateError::TokenExpired => AuthApiError::TokenExpired,
            ActivateError::TokenAlreadyUsed => AuthApiError::TokenAlreadyUsed,
            ActivateError::AlreadyActive => AuthApiError::AlreadyActive,
            ActivateError::CredentialStoreError(e) => AuthApiError::Upstream(e.to_string()),
            ActivateError::DeadlineExceeded(_) => AuthApiError::DeadlineExceeded,
        }
    }
}

impl From<LoginError> for AuthApiError {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::InvalidInput(e) => AuthApiError::InvalidInput(e),
            LoginError::InvalidCredentials => AuthApiError::InvalidCredentials,
            LoginError::CredentialStoreError(e) => AuthApiError::Upstream(e.to_string()),
            LoginError::PasswordHasherError(e) => AuthApiError::Upstream(e.to_string()),
            LoginError::TokenSignerError(e) => AuthApiError::Upstream(e.to_string()),
            LoginError::DeadlineExceeded(_) => AuthApiError::DeadlineExceeded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_application::DeadlineExceeded;
    use latchkey_core::{CredentialStoreError, NotifierError, TokenSignerError, UserId};
    use std::time::Duration;

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AuthApiError::InvalidInput("bad".into()), StatusCode::BAD_REQUEST),
            (AuthApiError::EmailTaken, StatusCode::CONFLICT),
            (AuthApiError::TokenNotFound, StatusCode::NOT_FOUND),
            (AuthApiError::TokenExpired, StatusCode::GONE),
            (AuthApiError::TokenAlreadyUsed, StatusCode::CONFLICT),
            (AuthApiError::AlreadyActive, StatusCode::CONFLICT),
            (AuthApiError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthApiError::NotifyFailed, StatusCode::BAD_GATEWAY),
            (AuthApiError::Upstream("db".into()), StatusCode::SERVICE_UNAVAILABLE),
            (AuthApiError::DeadlineExceeded, StatusCode::GATEWAY_TIMEOUT),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_upstream_detail_is_not_leaked() {
        let error = AuthApiError::from(LoginError::CredentialStoreError(
            CredentialStoreError::UnexpectedError("password authentication failed".into()),
        ));

        let body = body_of(error.into_response()).await;
        assert_eq!(body.error, "Service temporarily unavailable");
    }

    #[test]
    fn test_use_case_errors_map_to_api_errors() {
        assert!(matches!(
            AuthApiError::from(PreRegisterError::NotifyFailed {
                user_id: UserId::new(),
                source: NotifierError("smtp down".into()),
            }),
            AuthApiError::NotifyFailed
        ));
        assert!(matches!(
            AuthApiError::from(ActivateError::TokenExpired),
            AuthApiError::TokenExpired
        ));
        assert!(matches!(
            AuthApiError::from(LoginError::TokenSignerError(TokenSignerError("key".into()))),
            AuthApiError::Upstream(_)
        ));
        assert!(matches!(
            AuthApiError::from(LoginError::DeadlineExceeded(DeadlineExceeded(
                Duration::from_secs(1)
            ))),
            AuthApiError::DeadlineExceeded
        ));
    }
}
