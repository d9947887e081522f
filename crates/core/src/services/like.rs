//! Like service.
//!
//! Likes are idempotent toggles. Membership and the denormalized counter
//! move together inside one transaction in the repository layer.

use serde::Serialize;
use studyhub_common::{AppResult, IdGenerator};
use studyhub_db::repositories::{CommentRepository, LikeRepository, QuestionRepository};

/// Result of a like toggle.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggleResult {
    pub likes_count: i32,
    pub liked: bool,
}

/// Like service.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
    question_repo: QuestionRepository,
    comment_repo: CommentRepository,
    id_gen: IdGenerator,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(
        like_repo: LikeRepository,
        question_repo: QuestionRepository,
        comment_repo: CommentRepository,
    ) -> Self {
        Self {
            like_repo,
            question_repo,
            comment_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle the user's like on a question.
    pub async fn toggle_question(
        &self,
        user_id: &str,
        question_id: &str,
    ) -> AppResult<LikeToggleResult> {
        self.question_repo.get_by_id(question_id).await?;

        let (liked, likes_count) = self
            .like_repo
            .toggle_question_like(&self.id_gen.generate(), user_id, question_id)
            .await?;

        Ok(LikeToggleResult { likes_count, liked })
    }

    /// Toggle the user's like on a comment.
    pub async fn toggle_comment(
        &self,
        user_id: &str,
        comment_id: &str,
    ) -> AppResult<LikeToggleResult> {
        self.comment_repo.get_by_id(comment_id).await?;

        let (liked, likes_count) = self
            .like_repo
            .toggle_comment_like(&self.id_gen.generate(), user_id, comment_id)
            .await?;

        Ok(LikeToggleResult { likes_count, liked })
    }

    /// Whether the user has liked a question.
    pub async fn has_liked_question(&self, user_id: &str, question_id: &str) -> AppResult<bool> {
        self.like_repo.has_liked_question(user_id, question_id).await
    }

    /// Whether the user has liked a comment.
    pub async fn has_liked_comment(&self, user_id: &str, comment_id: &str) -> AppResult<bool> {
        self.like_repo.has_liked_comment(user_id, comment_id).await
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
    use studyhub_db::entities::{question, question_like};

    fn make_question(id: &str, likes: i32) -> question::Model {
        question::Model {
            id: id.to_string(),
            user_id: "u1".to_string(),
            course_id: "c1".to_string(),
            question_type: question::QuestionType::Essay,
            text: "Compare BFS and DFS.".to_string(),
            options: None,
            likes_count: likes,
            reports_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn make_like(id: &str, user_id: &str, question_id: &str) -> question_like::Model {
        question_like::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            question_id: question_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn service(
        like_db: Arc<sea_orm::DatabaseConnection>,
        question_db: Arc<sea_orm::DatabaseConnection>,
    ) -> LikeService {
        let comment_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        LikeService::new(
            LikeRepository::new(like_db),
            QuestionRepository::new(question_db),
            CommentRepository::new(comment_db),
        )
    }

    #[tokio::test]
    async fn test_toggle_unknown_question_is_not_found() {
        let like_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let question_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<question::Model>::new()])
                .into_connection(),
        );
        let service = service(like_db, question_db);

        let result = service.toggle_question("u1", "missing").await;
        assert!(matches!(result, Err(AppError::QuestionNotFound(_))));
    }

    #[tokio::test]
    async fn test_toggle_adds_like() {
        // Inside the toggle transaction: no existing like, insert, counter
        // bump, then the question is re-read for the fresh count.
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<question_like::Model>::new()])
                .append_query_results([[make_like("l1", "u1", "q1")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[make_question("q1", 1)]])
                .into_connection(),
        );
        let question_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_question("q1", 0)]])
                .into_connection(),
        );
        let service = service(like_db, question_db);

        let result = service.toggle_question("u1", "q1").await.unwrap();
        assert!(result.liked);
        assert_eq!(result.likes_count, 1);
    }

    #[tokio::test]
    async fn test_toggle_removes_like() {
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_like("l1", "u1", "q1")]])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .append_query_results([[make_question("q1", 0)]])
                .into_connection(),
        );
        let question_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[make_question("q1", 1)]])
                .into_connection(),
        );
        let service = service(like_db, question_db);

        let result = service.toggle_question("u1", "q1").await.unwrap();
        assert!(!result.liked);
        assert_eq!(result.likes_count, 0);
    }
}
