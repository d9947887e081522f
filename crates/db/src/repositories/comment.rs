//! Comment repository.

use std::sync::Arc;

use crate::entities::{Comment, comment};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait, sea_query::Expr,
};
use studyhub_common::{AppError, AppResult};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a comment by ID, failing when missing.
    pub async fn get_by_id(&self, id: &str) -> AppResult<comment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::CommentNotFound(id.to_string()))
    }

    /// Create a comment. A reply also bumps the parent's reply counter
    /// inside the same transaction.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let created = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if let Some(parent_id) = created.parent_comment_id.clone() {
            Comment::update_many()
                .col_expr(
                    comment::Column::RepliesCount,
                    Expr::col(comment::Column::RepliesCount).add(1),
                )
                .filter(comment::Column::Id.eq(parent_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(created)
    }

    /// Top-level comments on a question, newest first.
    pub async fn find_top_level(&self, question_id: &str) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::QuestionId.eq(question_id))
            .filter(comment::Column::ParentCommentId.is_null())
            .order_by_desc(comment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Direct replies to a comment, oldest first.
    pub async fn find_replies(&self, parent_id: &str) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::ParentCommentId.eq(parent_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a comment together with all transitive replies in one
    /// transaction. Returns the number of deleted rows.
    pub async fn delete_cascade(&self, root: &comment::Model) -> AppResult<u64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Walk the reply tree level by level, collecting every descendant.
        let mut all_ids = vec![root.id.clone()];
        let mut frontier = vec![root.id.clone()];
        while !frontier.is_empty() {
            let children = Comment::find()
                .filter(comment::Column::ParentCommentId.is_in(frontier.clone()))
                .all(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            frontier = children
                .iter()
                .filter(|c| !all_ids.contains(&c.id))
                .map(|c| c.id.clone())
                .collect();
            all_ids.extend(frontier.iter().cloned());
        }

        let deleted = Comment::delete_many()
            .filter(comment::Column::Id.is_in(all_ids))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .rows_affected;

        if let Some(parent_id) = &root.parent_comment_id {
            Comment::update_many()
                .col_expr(
                    comment::Column::RepliesCount,
                    Expr::cust("GREATEST(replies_count - 1, 0)"),
                )
                .filter(comment::Column::Id.eq(parent_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(deleted)
    }
}
