//! Bookmark service.

use studyhub_common::{AppResult, IdGenerator};
use studyhub_db::{
    entities::question,
    repositories::{BookmarkRepository, QuestionRepository},
};

/// Bookmark service for saved questions.
#[derive(Clone)]
pub struct BookmarkService {
    bookmark_repo: BookmarkRepository,
    question_repo: QuestionRepository,
    id_gen: IdGenerator,
}

impl BookmarkService {
    /// Create a new bookmark service.
    #[must_use]
    pub const fn new(bookmark_repo: BookmarkRepository, question_repo: QuestionRepository) -> Self {
        Self {
            bookmark_repo,
            question_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle the user's bookmark on a question. Returns the new membership.
    pub async fn toggle(&self, user_id: &str, question_id: &str) -> AppResult<bool> {
        self.question_repo.get_by_id(question_id).await?;
        self.bookmark_repo
            .toggle(&self.id_gen.generate(), user_id, question_id)
            .await
    }

    /// Whether the user has bookmarked a question.
    pub async fn is_bookmarked(&self, user_id: &str, question_id: &str) -> AppResult<bool> {
        self.bookmark_repo.is_bookmarked(user_id, question_id).await
    }

    /// Questions the user has bookmarked, most recently bookmarked first.
    pub async fn list(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<question::Model>> {
        self.bookmark_repo
            .find_questions_by_user(user_id, limit, offset)
            .await
    }

    /// Count the user's bookmarks.
    pub async fn count(&self, user_id: &str) -> AppResult<u64> {
        self.bookmark_repo.count_by_user(user_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;
    use studyhub_common::AppError;
    use studyhub_db::entities::bookmark;

    fn make_question(id: &str) -> question::Model {
        question::Model {
            id: id.to_string(),
            user_id: "u1".to_string(),
            course_id: "c1".to_string(),
            question_type: question::QuestionType::Essay,
            text: "Compare BFS and DFS.".to_string(),
            options: None,
            likes_count: 0,
            reports_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn make_bookmark(id: &str, user_id: &str, question_id: &str) -> bookmark::Model {
        bookmark::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            question_id: question_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_toggle_unknown_question_is_not_found() {
        let bookmark_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let question_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<question::Model>::new()])
                .into_connection(),
        );
        let service = BookmarkService::new(
            BookmarkRepository::new(bookmark_db),
            QuestionRepository::new(question_db),
        );

        let result = service.toggle("u1", "missing").await;
        assert!(matches!(result, Err(AppError::QuestionNotFound(_))));
    }

    #[tokio::test]
    async fn test_toggle_adds_bookmark() {
        let bookmark_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<bookmark::Model>::new()])
                .append_query_results([[make_bookmark("b1", "u1", "q1")]])
                .into_connection(),
        );
        let question_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_question("q1")]])
                .into_connection(),
        );
        let service = BookmarkService::new(
            BookmarkRepository::new(bookmark_db),
            QuestionRepository::new(question_db),
        );

        assert!(service.toggle("u1", "q1").await.unwrap());
    }

    #[tokio::test]
    async fn test_toggle_removes_bookmark() {
        let bookmark_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_bookmark("b1", "u1", "q1")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let question_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_question("q1")]])
                .into_connection(),
        );
        let service = BookmarkService::new(
            BookmarkRepository::new(bookmark_db),
            QuestionRepository::new(question_db),
        );

        assert!(!service.toggle("u1", "q1").await.unwrap());
    }
}
