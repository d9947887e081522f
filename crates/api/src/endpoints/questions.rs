//! Question endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};
use studyhub_common::AppResult;
use studyhub_core::{CreateQuestionInput, CreateReportInput, LikeToggleResult};
use studyhub_db::entities::question::{self, QuestionType};

use crate::{
    endpoints::reports::ReportTargetRequest, extractors::AuthUser, middleware::AppState,
    response::MessageResponse,
};

/// Question response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub question_type: QuestionType,
    pub text: String,
    pub options: Option<serde_json::Value>,
    pub likes_count: i32,
    pub reports_count: i32,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<question::Model> for QuestionResponse {
    fn from(q: question::Model) -> Self {
        Self {
            id: q.id,
            user_id: q.user_id,
            course_id: q.course_id,
            question_type: q.question_type,
            text: q.text,
            options: q.options,
            likes_count: q.likes_count,
            reports_count: q.reports_count,
            created_at: q.created_at.to_rfc3339(),
            updated_at: q.updated_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Bookmark toggle response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkToggleResponse {
    pub bookmarked: bool,
}

/// List questions request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuestionsQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    20
}

/// Post a new question.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateQuestionInput>,
) -> AppResult<(StatusCode, Json<QuestionResponse>)> {
    let question = state.question_service.create(&user.id, input).await?;

    Ok((StatusCode::CREATED, Json(question.into())))
}

/// Show a question.
async fn show(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<QuestionResponse>> {
    let question = state.question_service.get_by_id(&id).await?;

    Ok(Json(question.into()))
}

/// List a course's questions, newest first.
async fn list_by_course(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Query(query): Query<ListQuestionsQuery>,
) -> AppResult<Json<Vec<QuestionResponse>>> {
    let limit = query.limit.min(100);
    let questions = state
        .question_service
        .list_by_course(&course_id, limit, query.offset)
        .await?;

    Ok(Json(questions.into_iter().map(Into::into).collect()))
}

/// Toggle the signed-in user's like on a question.
async fn like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<LikeToggleResult>> {
    let result = state.like_service.toggle_question(&user.id, &id).await?;

    Ok(Json(result))
}

/// Toggle the signed-in user's bookmark on a question.
async fn bookmark(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookmarkToggleResponse>> {
    let bookmarked = state.bookmark_service.toggle(&user.id, &id).await?;

    Ok(Json(BookmarkToggleResponse { bookmarked }))
}

/// Report a question.
async fn report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReportTargetRequest>,
) -> AppResult<Json<MessageResponse>> {
    let input = CreateReportInput {
        question_id: Some(id),
        comment_id: None,
        reason: req.reason,
        description: req.description,
    };
    state.report_service.create(&user.id, input).await?;

    Ok(Json(MessageResponse::new("Report submitted")))
}

/// Delete a question (owner or moderator).
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.question_service.delete(&user, &id).await?;

    Ok(Json(MessageResponse::new("Question deleted")))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/course/{course_id}", get(list_by_course))
        .route("/{id}", get(show).delete(remove))
        .route("/{id}/like", patch(like))
        .route("/{id}/bookmark", patch(bookmark))
        .route("/{id}/report", patch(report))
}
