//! User endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, put},
};
use serde::{Deserialize, Serialize};
use studyhub_common::{AppError, AppResult};
use studyhub_core::{BlockUserInput, ChangeRoleInput, authz};
use studyhub_db::entities::user::{self, UserRole};

use crate::{
    endpoints::questions::QuestionResponse, extractors::AuthUser, middleware::AppState,
    response::MessageResponse,
};

/// User response. Magic link columns never leave the server.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub student_id: String,
    pub role: UserRole,
    pub blocked_until: Option<String>,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            student_id: u.student_id,
            role: u.role,
            blocked_until: u.blocked_until.map(|dt| dt.to_rfc3339()),
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// List users request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    20
}

/// The signed-in user.
async fn me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(user.into())
}

/// The signed-in user's bookmarked questions.
async fn my_bookmarks(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<Vec<QuestionResponse>>> {
    let limit = query.limit.min(100);
    let questions = state
        .bookmark_service
        .list(&user.id, limit, query.offset)
        .await?;

    Ok(Json(questions.into_iter().map(Into::into).collect()))
}

/// List all users (moderators only).
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<Vec<UserResponse>>> {
    if !authz::can_moderate(&user) {
        return Err(AppError::Forbidden(
            "Moderator capability required".to_string(),
        ));
    }

    let limit = query.limit.min(100);
    let users = state.user_service.list(limit, query.offset).await?;

    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Block a user for a number of days (moderators only).
async fn block(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<BlockUserInput>,
) -> AppResult<Json<MessageResponse>> {
    state.user_service.block(&user, &id, input).await?;

    Ok(Json(MessageResponse::new("User blocked")))
}

/// Lift a user's block (moderators only).
async fn unblock(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.user_service.unblock(&user, &id).await?;

    Ok(Json(MessageResponse::new("User unblocked")))
}

/// Change a user's role (super admins only).
async fn change_role(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ChangeRoleInput>,
) -> AppResult<Json<UserResponse>> {
    let updated = state.user_service.change_role(&user, &id, input).await?;

    Ok(Json(updated.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/me/bookmarks", get(my_bookmarks))
        .route("/admin", get(list))
        .route("/{id}/block", patch(block))
        .route("/{id}/unblock", patch(unblock))
        .route("/{id}/role", put(change_role))
}
