//! Question repository.

use std::sync::Arc;

use crate::entities::{Question, question};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use studyhub_common::{AppError, AppResult};

/// Question repository for database operations.
#[derive(Clone)]
pub struct QuestionRepository {
    db: Arc<DatabaseConnection>,
}

impl QuestionRepository {
    /// Create a new question repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a question by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<question::Model>> {
        Question::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a question by ID, failing when missing.
    pub async fn get_by_id(&self, id: &str) -> AppResult<question::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::QuestionNotFound(id.to_string()))
    }

    /// Create a new question.
    pub async fn create(&self, model: question::ActiveModel) -> AppResult<question::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a question. Likes, bookmarks, comments and reports follow
    /// through their foreign keys.
    pub async fn delete(&self, model: question::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List questions in a course (paginated, newest first).
    pub async fn find_by_course(
        &self,
        course_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<question::Model>> {
        Question::find()
            .filter(question::Column::CourseId.eq(course_id))
            .order_by_desc(question::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count questions posted by a user.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        Question::find()
            .filter(question::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all questions.
    pub async fn count(&self) -> AppResult<u64> {
        Question::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::question::QuestionType;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_question(id: &str, user_id: &str, course_id: &str) -> question::Model {
        question::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            question_type: QuestionType::Essay,
            text: "Explain the difference between a stack and a queue.".to_string(),
            options: None,
            likes_count: 0,
            reports_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let question = create_test_question("q1", "u1", "c1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[question.clone()]])
                .into_connection(),
        );

        let repo = QuestionRepository::new(db);
        let result = repo.find_by_id("q1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, "q1");
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<question::Model>::new()])
                .into_connection(),
        );

        let repo = QuestionRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::QuestionNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_course() {
        let q1 = create_test_question("q1", "u1", "c1");
        let q2 = create_test_question("q2", "u2", "c1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[q1, q2]])
                .into_connection(),
        );

        let repo = QuestionRepository::new(db);
        let result = repo.find_by_course("c1", 20, 0).await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
