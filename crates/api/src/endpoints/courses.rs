//! Course endpoints.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use studyhub_common::AppResult;
use studyhub_core::CreateCourseInput;
use studyhub_db::entities::course;

use crate::{extractors::AuthUser, middleware::AppState};

/// Course response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: String,
    pub code: String,
    pub name: String,
    pub created_at: String,
}

impl From<course::Model> for CourseResponse {
    fn from(c: course::Model) -> Self {
        Self {
            id: c.id,
            code: c.code,
            name: c.name,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// List all courses.
async fn list(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CourseResponse>>> {
    let courses = state.course_service.list().await?;

    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

/// Create a course (moderators only).
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCourseInput>,
) -> AppResult<(StatusCode, Json<CourseResponse>)> {
    let course = state.course_service.create(&user, input).await?;

    Ok((StatusCode::CREATED, Json(course.into())))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list).post(create))
}
