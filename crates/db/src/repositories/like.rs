//! Like repository for questions and comments.
//!
//! A toggle runs inside a single transaction: membership lookup, row
//! insert or delete, counter update, counter re-read. The unique index
//! on (user, target) backstops concurrent toggles.

use std::sync::Arc;

use crate::entities::{
    Comment, CommentLike, Question, QuestionLike, comment, comment_like, question, question_like,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
    TransactionTrait, sea_query::Expr,
};
use studyhub_common::{AppError, AppResult};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check if a user has liked a question.
    pub async fn has_liked_question(&self, user_id: &str, question_id: &str) -> AppResult<bool> {
        Ok(QuestionLike::find()
            .filter(question_like::Column::UserId.eq(user_id))
            .filter(question_like::Column::QuestionId.eq(question_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .is_some())
    }

    /// Check if a user has liked a comment.
    pub async fn has_liked_comment(&self, user_id: &str, comment_id: &str) -> AppResult<bool> {
        Ok(CommentLike::find()
            .filter(comment_like::Column::UserId.eq(user_id))
            .filter(comment_like::Column::CommentId.eq(comment_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .is_some())
    }

    /// Toggle a user's like on a question. Returns the new membership and
    /// the question's like count after the toggle.
    pub async fn toggle_question_like(
        &self,
        new_id: &str,
        user_id: &str,
        question_id: &str,
    ) -> AppResult<(bool, i32)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let existing = QuestionLike::find()
            .filter(question_like::Column::UserId.eq(user_id))
            .filter(question_like::Column::QuestionId.eq(question_id))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let liked = if let Some(like) = existing {
            like.delete(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            Question::update_many()
                .col_expr(
                    question::Column::LikesCount,
                    Expr::cust("GREATEST(likes_count - 1, 0)"),
                )
                .filter(question::Column::Id.eq(question_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            false
        } else {
            question_like::ActiveModel {
                id: Set(new_id.to_string()),
                user_id: Set(user_id.to_string()),
                question_id: Set(question_id.to_string()),
                created_at: Set(chrono::Utc::now().into()),
            }
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
            Question::update_many()
                .col_expr(
                    question::Column::LikesCount,
                    Expr::col(question::Column::LikesCount).add(1),
                )
                .filter(question::Column::Id.eq(question_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            true
        };

        let likes_count = Question::find_by_id(question_id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::QuestionNotFound(question_id.to_string()))?
            .likes_count;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((liked, likes_count))
    }

    /// Toggle a user's like on a comment. Returns the new membership and
    /// the comment's like count after the toggle.
    pub async fn toggle_comment_like(
        &self,
        new_id: &str,
        user_id: &str,
        comment_id: &str,
    ) -> AppResult<(bool, i32)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let existing = CommentLike::find()
            .filter(comment_like::Column::UserId.eq(user_id))
            .filter(comment_like::Column::CommentId.eq(comment_id))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let liked = if let Some(like) = existing {
            like.delete(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            Comment::update_many()
                .col_expr(
                    comment::Column::LikesCount,
                    Expr::cust("GREATEST(likes_count - 1, 0)"),
                )
                .filter(comment::Column::Id.eq(comment_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            false
        } else {
            comment_like::ActiveModel {
                id: Set(new_id.to_string()),
                user_id: Set(user_id.to_string()),
                comment_id: Set(comment_id.to_string()),
                created_at: Set(chrono::Utc::now().into()),
            }
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
            Comment::update_many()
                .col_expr(
                    comment::Column::LikesCount,
                    Expr::col(comment::Column::LikesCount).add(1),
                )
                .filter(comment::Column::Id.eq(comment_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            true
        };

        let likes_count = Comment::find_by_id(comment_id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::CommentNotFound(comment_id.to_string()))?
            .likes_count;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((liked, likes_count))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::question::QuestionType;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_like(id: &str, user_id: &str, question_id: &str) -> question_like::Model {
        question_like::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            question_id: question_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn create_test_question(id: &str, likes_count: i32) -> question::Model {
        question::Model {
            id: id.to_string(),
            user_id: "u1".to_string(),
            course_id: "c1".to_string(),
            question_type: QuestionType::Essay,
            text: "Why does quicksort degrade on sorted input?".to_string(),
            options: None,
            likes_count,
            reports_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_toggle_adds_like_when_absent() {
        let like = create_test_like("l1", "u2", "q1");
        let question = create_test_question("q1", 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // membership lookup comes back empty
                .append_query_results([Vec::<question_like::Model>::new()])
                // insert returns the new row
                .append_query_results([[like]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                // counter re-read after the increment
                .append_query_results([[question]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let (liked, count) = repo.toggle_question_like("l1", "u2", "q1").await.unwrap();

        assert!(liked);
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_toggle_removes_like_when_present() {
        let like = create_test_like("l1", "u2", "q1");
        let question = create_test_question("q1", 0);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like]])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1, // like row deleted
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1, // counter decremented
                    },
                ])
                .append_query_results([[question]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let (liked, count) = repo.toggle_question_like("l2", "u2", "q1").await.unwrap();

        assert!(!liked);
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_has_liked_question() {
        let like = create_test_like("l1", "u2", "q1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        assert!(repo.has_liked_question("u2", "q1").await.unwrap());
    }
}
