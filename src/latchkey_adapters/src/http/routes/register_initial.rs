use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use latchkey_application::{PreRegisterRequest, PreRegisterUseCase};
use latchkey_core::{Clock, CredentialStore, Notifier, PasswordHasher, ProfileFields};
use secrecy::Secret;
use serde::{Deserialize, Serialize};

use super::{FlowState, error::AuthApiError};

#[derive(Deserialize)]
pub struct RegisterInitialRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
    #[serde(flatten)]
    pub profile: ProfileFields,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInitialResponse {
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

#[tracing::instrument(name = "Register initial", skip_all)]
pub async fn register_initial<S, N, H, C>(
    State(state): State<FlowState<PreRegisterUseCase<S, N, H, C>>>,
    payload: Result<Json<RegisterInitialRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: CredentialStore + 'static,
    N: Notifier + 'static,
    H: PasswordHasher + 'static,
    C: Clock + 'static,
{
    let Json(request) = payload?;

    let sent = state
        .flow
        .execute_within(
            state.deadline,
            PreRegisterRequest {
                email: request.email,
                password: request.password,
                profile: request.profile,
            },
        )
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(RegisterInitialResponse {
            message: "Check your inbox for the activation link".to_string(),
            expires_at: sent.expires_at,
        }),
    ))
}
