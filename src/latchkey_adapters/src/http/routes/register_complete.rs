use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use latchkey_application::ActivateUseCase;
use latchkey_core::{Clock, CredentialStore, UserId};
use secrecy::Secret;
use serde::{Deserialize, Serialize};

use super::{FlowState, error::AuthApiError};

#[derive(Deserialize)]
pub struct RegisterCompleteRequest {
    pub token: Secret<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCompleteResponse {
    pub user_id: UserId,
}

#[tracing::instrument(name = "Register complete", skip_all)]
pub async fn register_complete<S, C>(
    State(state): State<FlowState<ActivateUseCase<S, C>>>,
    payload: Result<Json<RegisterCompleteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: CredentialStore + 'static,
    C: Clock + 'static,
{
    let Json(request) = payload?;

    let user_id = state
        .flow
        .execute_within(state.deadline, request.token)
        .await?;

    Ok((StatusCode::OK, Json(RegisterCompleteResponse { user_id })))
}
