//! Course service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use studyhub_common::{AppError, AppResult, IdGenerator};
use studyhub_db::{
    entities::{course, user},
    repositories::CourseRepository,
};
use validator::Validate;

use crate::authz;

/// Input for creating a course.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseInput {
    #[validate(length(min = 1, max = 32))]
    pub code: String,
    #[validate(length(min = 1, max = 256))]
    pub name: String,
}

/// Course service.
#[derive(Clone)]
pub struct CourseService {
    course_repo: CourseRepository,
    id_gen: IdGenerator,
}

impl CourseService {
    /// Create a new course service.
    #[must_use]
    pub const fn new(course_repo: CourseRepository) -> Self {
        Self {
            course_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List all courses, ordered by code.
    pub async fn list(&self) -> AppResult<Vec<course::Model>> {
        self.course_repo.list().await
    }

    /// Get a course by ID, failing when missing.
    pub async fn get_by_id(&self, id: &str) -> AppResult<course::Model> {
        self.course_repo.get_by_id(id).await
    }

    /// Create a course. Moderator only; codes are unique.
    pub async fn create(
        &self,
        actor: &user::Model,
        input: CreateCourseInput,
    ) -> AppResult<course::Model> {
        input.validate()?;

        if !authz::can_moderate(actor) {
            return Err(AppError::Forbidden(
                "Moderator capability required".to_string(),
            ));
        }

        let code = input.code.trim().to_uppercase();
        if self.course_repo.find_by_code(&code).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Course code {code} already exists"
            )));
        }

        let model = course::ActiveModel {
            id: Set(self.id_gen.generate()),
            code: Set(code),
            name: Set(input.name.trim().to_string()),
            created_at: Set(Utc::now().into()),
        };

        self.course_repo.create(model).await
    }
}
