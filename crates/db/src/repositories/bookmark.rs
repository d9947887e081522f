//! Bookmark repository.

use std::sync::Arc;

use crate::entities::{Bookmark, Question, bookmark, question};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, Set, Statement,
};
use studyhub_common::{AppError, AppResult};

/// Bookmark repository for database operations.
#[derive(Clone)]
pub struct BookmarkRepository {
    db: Arc<DatabaseConnection>,
}

impl BookmarkRepository {
    /// Create a new bookmark repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a bookmark by user and question.
    pub async fn find_by_user_and_question(
        &self,
        user_id: &str,
        question_id: &str,
    ) -> AppResult<Option<bookmark::Model>> {
        Bookmark::find()
            .filter(bookmark::Column::UserId.eq(user_id))
            .filter(bookmark::Column::QuestionId.eq(question_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user has bookmarked a question.
    pub async fn is_bookmarked(&self, user_id: &str, question_id: &str) -> AppResult<bool> {
        Ok(self
            .find_by_user_and_question(user_id, question_id)
            .await?
            .is_some())
    }

    /// Toggle a user's bookmark on a question. Returns the new membership.
    pub async fn toggle(
        &self,
        new_id: &str,
        user_id: &str,
        question_id: &str,
    ) -> AppResult<bool> {
        match self.find_by_user_and_question(user_id, question_id).await? {
            Some(existing) => {
                existing
                    .delete(self.db.as_ref())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(false)
            }
            None => {
                bookmark::ActiveModel {
                    id: Set(new_id.to_string()),
                    user_id: Set(user_id.to_string()),
                    question_id: Set(question_id.to_string()),
                    created_at: Set(chrono::Utc::now().into()),
                }
                .insert(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(true)
            }
        }
    }

    /// Questions a user has bookmarked, most recently bookmarked first.
    pub async fn find_questions_by_user(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<question::Model>> {
        let sql = r#"
            SELECT
                q.id, q.user_id, q.course_id, q.question_type, q.text, q.options,
                q.likes_count, q.reports_count, q.created_at, q.updated_at
            FROM question q
            INNER JOIN bookmark b ON b.question_id = q.id
            WHERE b.user_id = $1
            ORDER BY b.created_at DESC
            LIMIT $2 OFFSET $3
        "#;

        Question::find()
            .from_raw_sql(Statement::from_sql_and_values(
                DbBackend::Postgres,
                sql,
                [
                    user_id.into(),
                    (limit as i64).into(),
                    (offset as i64).into(),
                ],
            ))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count a user's bookmarks.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        Bookmark::find()
            .filter(bookmark::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
