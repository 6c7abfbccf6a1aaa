use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use latchkey_application::LoginUseCase;
use latchkey_core::{Clock, CredentialStore, PasswordHasher, TokenSigner};
use secrecy::Secret;
use serde::{Deserialize, Serialize};

use crate::auth::create_auth_cookie;

use super::{FlowState, error::AuthApiError};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginHttpResponse {
    pub token: String,
}

/// Login flow plus the name of the cookie the token is delivered in.
pub type LoginState<S, H, T, C> = (FlowState<LoginUseCase<S, H, T, C>>, String);

#[tracing::instrument(name = "Login", skip_all)]
pub async fn login<S, H, T, C>(
    State((state, cookie_name)): State<LoginState<S, H, T, C>>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: CredentialStore + 'static,
    H: PasswordHasher + 'static,
    T: TokenSigner + 'static,
    C: Clock + 'static,
{
    let Json(request) = payload?;

    let token = state
        .flow
        .execute_within(state.deadline, request.email, request.password)
        .await?;

    let body = LoginHttpResponse {
        token: token.as_str().to_owned(),
    };
    let jar = jar.add(create_auth_cookie(token, &cookie_name));

    Ok((jar, (StatusCode::OK, Json(body))))
}
