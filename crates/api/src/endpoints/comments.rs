//! Comment endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
};
use serde::Serialize;
use studyhub_common::AppResult;
use studyhub_core::{CreateCommentInput, CreateReportInput, LikeToggleResult};
use studyhub_db::entities::comment;

use crate::{
    endpoints::reports::ReportTargetRequest, extractors::AuthUser, middleware::AppState,
    response::MessageResponse,
};

/// Comment response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub question_id: String,
    pub user_id: String,
    pub text: String,
    pub parent_comment_id: Option<String>,
    pub likes_count: i32,
    pub reports_count: i32,
    pub replies_count: i32,
    pub created_at: String,
}

impl From<comment::Model> for CommentResponse {
    fn from(c: comment::Model) -> Self {
        Self {
            id: c.id,
            question_id: c.question_id,
            user_id: c.user_id,
            text: c.text,
            parent_comment_id: c.parent_comment_id,
            likes_count: c.likes_count,
            reports_count: c.reports_count,
            replies_count: c.replies_count,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Post a comment or a reply.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<(StatusCode, Json<CommentResponse>)> {
    let comment = state.comment_service.create(&user.id, input).await?;

    Ok((StatusCode::CREATED, Json(comment.into())))
}

/// Top-level comments on a question, newest first.
async fn list_for_question(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    let comments = state
        .comment_service
        .list_for_question(&question_id)
        .await?;

    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

/// Replies to a comment, oldest first.
async fn list_replies(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    let comments = state.comment_service.list_replies(&comment_id).await?;

    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

/// Toggle the signed-in user's like on a comment.
async fn like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<Json<LikeToggleResult>> {
    let result = state
        .like_service
        .toggle_comment(&user.id, &comment_id)
        .await?;

    Ok(Json(result))
}

/// Report a comment.
async fn report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Json(req): Json<ReportTargetRequest>,
) -> AppResult<Json<MessageResponse>> {
    let input = CreateReportInput {
        question_id: None,
        comment_id: Some(comment_id),
        reason: req.reason,
        description: req.description,
    };
    state.report_service.create(&user.id, input).await?;

    Ok(Json(MessageResponse::new("Report submitted")))
}

/// Delete a comment and its replies (owner or moderator).
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let removed = state.comment_service.delete(&user, &comment_id).await?;

    Ok(Json(MessageResponse::new(format!(
        "Deleted {removed} comments"
    ))))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/question/{question_id}", get(list_for_question))
        .route("/{comment_id}", delete(remove))
        .route("/{comment_id}/replies", get(list_replies))
        .route("/{comment_id}/like", patch(like))
        .route("/{comment_id}/report", patch(report))
}
