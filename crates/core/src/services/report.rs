//! Report service.
//!
//! Users flag questions or comments for moderator review. A report targets
//! exactly one thing, each user gets one report per target, and repeat
//! submissions are benign no-ops returning the existing row.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use studyhub_common::{AppError, AppResult, IdGenerator};
use studyhub_db::{
    entities::{
        report::{self, ReportReason, ReportStatus},
        user,
    },
    repositories::{CommentRepository, QuestionRepository, ReportAdminRow, ReportRepository},
};
use validator::Validate;

use crate::authz;

/// Input for submitting a report.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportInput {
    pub question_id: Option<String>,
    pub comment_id: Option<String>,
    pub reason: ReportReason,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Input for moving a report through the moderation workflow.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportStatusInput {
    pub status: ReportStatus,
    #[validate(length(max = 2000))]
    pub action_taken: Option<String>,
}

/// Whether a status closes the report.
const fn is_terminal(status: ReportStatus) -> bool {
    matches!(status, ReportStatus::Resolved | ReportStatus::Rejected)
}

/// Report service.
#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    question_repo: QuestionRepository,
    comment_repo: CommentRepository,
    id_gen: IdGenerator,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub const fn new(
        report_repo: ReportRepository,
        question_repo: QuestionRepository,
        comment_repo: CommentRepository,
    ) -> Self {
        Self {
            report_repo,
            question_repo,
            comment_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a report. Returns the row and whether it was newly created;
    /// an existing (reporter, target) report is returned as-is.
    pub async fn create(
        &self,
        reporter_id: &str,
        input: CreateReportInput,
    ) -> AppResult<(report::Model, bool)> {
        input.validate()?;

        match (&input.question_id, &input.comment_id) {
            (Some(_), None) | (None, Some(_)) => {}
            _ => {
                return Err(AppError::BadRequest(
                    "Report must target exactly one of a question or a comment".to_string(),
                ));
            }
        }

        if input.reason == ReportReason::ProvidingAnswers && input.question_id.is_none() {
            return Err(AppError::BadRequest(
                "This report reason applies to questions only".to_string(),
            ));
        }

        let description = input
            .description
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);
        if input.reason == ReportReason::Other && description.is_none() {
            return Err(AppError::BadRequest(
                "A description is required when the reason is other".to_string(),
            ));
        }

        let existing = if let Some(ref question_id) = input.question_id {
            self.question_repo.get_by_id(question_id).await?;
            self.report_repo
                .find_by_reporter_and_question(reporter_id, question_id)
                .await?
        } else {
            // Exactly-one validated above
            let comment_id = input.comment_id.as_deref().unwrap_or_default();
            self.comment_repo.get_by_id(comment_id).await?;
            self.report_repo
                .find_by_reporter_and_comment(reporter_id, comment_id)
                .await?
        };

        if let Some(report) = existing {
            return Ok((report, false));
        }

        let model = report::ActiveModel {
            id: Set(self.id_gen.generate()),
            reporter_id: Set(reporter_id.to_string()),
            question_id: Set(input.question_id),
            comment_id: Set(input.comment_id),
            reason: Set(input.reason),
            description: Set(description),
            status: Set(ReportStatus::Pending),
            action_taken: Set(None),
            created_at: Set(Utc::now().into()),
            resolved_at: Set(None),
        };

        let created = self.report_repo.create(model).await?;
        tracing::debug!(report_id = %created.id, reporter_id = %reporter_id, "Report submitted");
        Ok((created, true))
    }

    /// Get a report by ID, failing when missing.
    pub async fn get_by_id(&self, id: &str) -> AppResult<report::Model> {
        self.report_repo.get_by_id(id).await
    }

    /// Admin listing with reporter and target context joined in.
    pub async fn list_admin(
        &self,
        status: Option<ReportStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<ReportAdminRow>> {
        self.report_repo.list_admin(status, limit, offset).await
    }

    /// Move a report through the moderation workflow.
    ///
    /// Closing a report (resolved or rejected) requires a note on the action
    /// taken and stamps `resolved_at`; reopening clears it. Any transition
    /// is allowed.
    pub async fn update_status(
        &self,
        moderator: &user::Model,
        report_id: &str,
        input: UpdateReportStatusInput,
    ) -> AppResult<report::Model> {
        input.validate()?;

        if !authz::can_moderate(moderator) {
            return Err(AppError::Forbidden(
                "Moderator capability required".to_string(),
            ));
        }

        let report = self.report_repo.get_by_id(report_id).await?;

        let action_taken = input
            .action_taken
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let mut active: report::ActiveModel = report.into();
        active.status = Set(input.status);
        if is_terminal(input.status) {
            let action = action_taken.ok_or_else(|| {
                AppError::BadRequest(
                    "actionTaken is required when resolving or rejecting a report".to_string(),
                )
            })?;
            active.action_taken = Set(Some(action));
            active.resolved_at = Set(Some(Utc::now().into()));
        } else {
            if let Some(action) = action_taken {
                active.action_taken = Set(Some(action));
            }
            active.resolved_at = Set(None);
        }

        let updated = self.report_repo.update(active).await?;
        tracing::info!(
            report_id = %updated.id,
            status = ?updated.status,
            moderator_id = %moderator.id,
            "Report status updated"
        );
        Ok(updated)
    }
}
