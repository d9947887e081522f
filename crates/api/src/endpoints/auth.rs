//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::Serialize;
use studyhub_common::AppResult;
use studyhub_core::{RequestMagicLinkInput, VerifyMagicLinkInput};

use crate::{endpoints::users::UserResponse, middleware::AppState, response::MessageResponse};

/// Sign-in response carrying the bearer token and the signed-in user.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Request a magic sign-in link.
async fn magic_link(
    State(state): State<AppState>,
    Json(input): Json<RequestMagicLinkInput>,
) -> AppResult<Json<MessageResponse>> {
    state.auth_service.request_magic_link(input).await?;

    Ok(Json(MessageResponse::new("Sign-in link sent")))
}

/// Redeem a magic link for a bearer token.
async fn verify(
    State(state): State<AppState>,
    Json(input): Json<VerifyMagicLinkInput>,
) -> AppResult<Json<VerifyResponse>> {
    let (user, token) = state.auth_service.verify_magic_link(input).await?;

    Ok(Json(VerifyResponse {
        token,
        user: user.into(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/magic-link", post(magic_link))
        .route("/verify", post(verify))
}
