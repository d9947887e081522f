//! Report endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use studyhub_common::{AppError, AppResult};
use studyhub_core::{CreateReportInput, UpdateReportStatusInput, authz};
use studyhub_db::{
    entities::report::{self, ReportReason, ReportStatus},
    repositories::ReportAdminRow,
};

use crate::{extractors::AuthUser, middleware::AppState};

/// Report response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: String,
    pub reporter_id: String,
    pub question_id: Option<String>,
    pub comment_id: Option<String>,
    pub reason: ReportReason,
    pub description: Option<String>,
    pub status: ReportStatus,
    pub action_taken: Option<String>,
    pub created_at: String,
    pub resolved_at: Option<String>,
}

impl From<report::Model> for ReportResponse {
    fn from(r: report::Model) -> Self {
        Self {
            id: r.id,
            reporter_id: r.reporter_id,
            question_id: r.question_id,
            comment_id: r.comment_id,
            reason: r.reason,
            description: r.description,
            status: r.status,
            action_taken: r.action_taken,
            created_at: r.created_at.to_rfc3339(),
            resolved_at: r.resolved_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Admin listing row with reporter and target context.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAdminResponse {
    pub id: String,
    pub reporter_id: String,
    pub reporter_email: String,
    pub question_id: Option<String>,
    pub question_text: Option<String>,
    pub comment_id: Option<String>,
    pub comment_text: Option<String>,
    pub reason: ReportReason,
    pub description: Option<String>,
    pub status: ReportStatus,
    pub action_taken: Option<String>,
    pub created_at: String,
    pub resolved_at: Option<String>,
}

impl From<ReportAdminRow> for ReportAdminResponse {
    fn from(row: ReportAdminRow) -> Self {
        Self {
            id: row.id,
            reporter_id: row.reporter_id,
            reporter_email: row.reporter_email,
            question_id: row.question_id,
            question_text: row.question_text,
            comment_id: row.comment_id,
            comment_text: row.comment_text,
            reason: row.reason,
            description: row.description,
            status: row.status,
            action_taken: row.action_taken,
            created_at: row.created_at.to_rfc3339(),
            resolved_at: row.resolved_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Report body used by the question and comment report shortcuts.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTargetRequest {
    pub reason: ReportReason,
    pub description: Option<String>,
}

/// Admin listing request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReportsQuery {
    pub status: Option<ReportStatus>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    20
}

/// Submit a report. A repeat report on the same target answers 200 with
/// the existing row instead of 201.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateReportInput>,
) -> AppResult<Response> {
    let (report, created) = state.report_service.create(&user.id, input).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(ReportResponse::from(report))).into_response())
}

/// Move a report through the moderation workflow (moderators only).
async fn update_status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateReportStatusInput>,
) -> AppResult<Json<ReportResponse>> {
    let report = state.report_service.update_status(&user, &id, input).await?;

    Ok(Json(report.into()))
}

/// Admin report listing with reporter and target context joined in.
async fn list_admin(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListReportsQuery>,
) -> AppResult<Json<Vec<ReportAdminResponse>>> {
    if !authz::can_moderate(&user) {
        return Err(AppError::Forbidden(
            "Moderator capability required".to_string(),
        ));
    }

    let limit = query.limit.min(100);
    let rows = state
        .report_service
        .list_admin(query.status, limit, query.offset)
        .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/admin", get(list_admin))
        .route("/{id}", put(update_status))
}
