//! Question service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use studyhub_common::{AppError, AppResult, IdGenerator};
use studyhub_db::{
    entities::{
        question::{self, QuestionType},
        user,
    },
    repositories::{CourseRepository, QuestionRepository},
};
use validator::Validate;

use crate::authz;

/// Minimum answer options on a multiple choice question.
const MIN_MCQ_OPTIONS: usize = 2;

/// Input for creating a question.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionInput {
    pub course_id: String,
    pub question_type: QuestionType,
    #[validate(length(min = 1, max = 10000))]
    pub text: String,
    /// Answer options, multiple choice only.
    pub options: Option<Vec<String>>,
}

/// Question service.
#[derive(Clone)]
pub struct QuestionService {
    question_repo: QuestionRepository,
    course_repo: CourseRepository,
    id_gen: IdGenerator,
}

impl QuestionService {
    /// Create a new question service.
    #[must_use]
    pub const fn new(question_repo: QuestionRepository, course_repo: CourseRepository) -> Self {
        Self {
            question_repo,
            course_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Post a new question.
    pub async fn create(
        &self,
        user_id: &str,
        input: CreateQuestionInput,
    ) -> AppResult<question::Model> {
        input.validate()?;

        let options = normalize_options(input.question_type, input.options)?;

        // 404 for unknown courses rather than a foreign key error
        self.course_repo.get_by_id(&input.course_id).await?;

        let model = question::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            course_id: Set(input.course_id),
            question_type: Set(input.question_type),
            text: Set(input.text.trim().to_string()),
            options: Set(options.map(|o| serde_json::json!(o))),
            likes_count: Set(0),
            reports_count: Set(0),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        self.question_repo.create(model).await
    }

    /// Get a question by ID, failing when missing.
    pub async fn get_by_id(&self, id: &str) -> AppResult<question::Model> {
        self.question_repo.get_by_id(id).await
    }

    /// List a course's questions, newest first.
    pub async fn list_by_course(
        &self,
        course_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<question::Model>> {
        self.course_repo.get_by_id(course_id).await?;
        self.question_repo
            .find_by_course(course_id, limit, offset)
            .await
    }

    /// Delete a question. Owner or moderator only; comments, likes,
    /// bookmarks and reports follow via foreign keys.
    pub async fn delete(&self, actor: &user::Model, id: &str) -> AppResult<()> {
        let question = self.question_repo.get_by_id(id).await?;

        if !authz::can_delete_owned(actor, &question.user_id) {
            return Err(AppError::Forbidden(
                "Not allowed to delete this question".to_string(),
            ));
        }

        self.question_repo.delete(question).await?;
        tracing::debug!(question_id = %id, actor_id = %actor.id, "Question deleted");
        Ok(())
    }
}

/// Check the options against the question type and trim entries.
fn normalize_options(
    question_type: QuestionType,
    options: Option<Vec<String>>,
) -> AppResult<Option<Vec<String>>> {
    let entries: Vec<String> = options
        .unwrap_or_default()
        .into_iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();

    match question_type {
        QuestionType::Mcq => {
            if entries.len() < MIN_MCQ_OPTIONS {
                return Err(AppError::Validation(format!(
                    "Multiple choice questions need at least {MIN_MCQ_OPTIONS} options"
                )));
            }
            Ok(Some(entries))
        }
        QuestionType::Essay => {
            if entries.is_empty() {
                Ok(None)
            } else {
                Err(AppError::Validation(
                    "Essay questions cannot have options".to_string(),
                ))
            }
        }
    }
}
