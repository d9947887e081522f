//! Comment service.
//!
//! Comments form one level of visible threading: top-level comments on a
//! question, plus replies fetched per parent. Replies may nest further;
//! deletion always removes the whole subtree.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use studyhub_common::{AppError, AppResult, IdGenerator};
use studyhub_db::{
    entities::{comment, user},
    repositories::{CommentRepository, QuestionRepository},
};
use validator::Validate;

use crate::authz;

/// Input for creating a comment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    pub question_id: String,
    /// Parent comment when replying. Must belong to the same question.
    pub parent_comment_id: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub text: String,
}

/// Comment service.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    question_repo: QuestionRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(comment_repo: CommentRepository, question_repo: QuestionRepository) -> Self {
        Self {
            comment_repo,
            question_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Post a comment or reply.
    pub async fn create(
        &self,
        user_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        self.question_repo.get_by_id(&input.question_id).await?;

        if let Some(ref parent_id) = input.parent_comment_id {
            let parent = self.comment_repo.get_by_id(parent_id).await?;
            if parent.question_id != input.question_id {
                return Err(AppError::BadRequest(
                    "Parent comment belongs to a different question".to_string(),
                ));
            }
        }

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            question_id: Set(input.question_id),
            user_id: Set(user_id.to_string()),
            text: Set(input.text.trim().to_string()),
            parent_comment_id: Set(input.parent_comment_id),
            likes_count: Set(0),
            reports_count: Set(0),
            replies_count: Set(0),
            created_at: Set(Utc::now().into()),
        };

        self.comment_repo.create(model).await
    }

    /// Get a comment by ID, failing when missing.
    pub async fn get_by_id(&self, id: &str) -> AppResult<comment::Model> {
        self.comment_repo.get_by_id(id).await
    }

    /// Top-level comments on a question, newest first.
    pub async fn list_for_question(&self, question_id: &str) -> AppResult<Vec<comment::Model>> {
        self.question_repo.get_by_id(question_id).await?;
        self.comment_repo.find_top_level(question_id).await
    }

    /// Replies to one comment, oldest first.
    pub async fn list_replies(&self, comment_id: &str) -> AppResult<Vec<comment::Model>> {
        self.comment_repo.get_by_id(comment_id).await?;
        self.comment_repo.find_replies(comment_id).await
    }

    /// Delete a comment and every transitive reply. Owner or moderator only.
    /// Returns the number of removed comments.
    pub async fn delete(&self, actor: &user::Model, id: &str) -> AppResult<u64> {
        let comment = self.comment_repo.get_by_id(id).await?;

        if !authz::can_delete_owned(actor, &comment.user_id) {
            return Err(AppError::Forbidden(
                "Not allowed to delete this comment".to_string(),
            ));
        }

        let deleted = self.comment_repo.delete_cascade(&comment).await?;
        tracing::debug!(comment_id = %id, deleted, "Comment subtree deleted");
        Ok(deleted)
    }
}
