//! Report entity (user reports against questions or comments).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Report reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    #[sea_orm(string_value = "inappropriate")]
    Inappropriate,
    #[sea_orm(string_value = "spam")]
    Spam,
    #[sea_orm(string_value = "duplicate")]
    Duplicate,
    /// Posting answers to graded work. Only meaningful for questions.
    #[sea_orm(string_value = "providing_answers")]
    ProvidingAnswers,
    #[sea_orm(string_value = "harassment")]
    Harassment,
    /// Free-text reason, requires a description.
    #[sea_orm(string_value = "other")]
    Other,
}

/// Report status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum ReportStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "reviewed")]
    Reviewed,
    #[sea_orm(string_value = "resolved")]
    Resolved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Report model. Exactly one of `question_id` / `comment_id` is set,
/// enforced by a CHECK constraint and re-validated in the service layer.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// The user who submitted the report.
    pub reporter_id: String,
    /// Reported question, NULL when a comment is reported.
    #[sea_orm(nullable)]
    pub question_id: Option<String>,
    /// Reported comment, NULL when a question is reported.
    #[sea_orm(nullable)]
    pub comment_id: Option<String>,
    /// Reason for the report.
    pub reason: ReportReason,
    /// Free-text detail, required when reason is `other`.
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Current status of the report.
    pub status: ReportStatus,
    /// What the moderator did, required to close a report.
    #[sea_orm(column_type = "Text", nullable)]
    pub action_taken: Option<String>,
    /// When the report was created.
    pub created_at: DateTimeWithTimeZone,
    /// When the report reached a terminal status. NULL while open.
    #[sea_orm(nullable)]
    pub resolved_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReporterId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Reporter,

    #[sea_orm(
        belongs_to = "super::question::Entity",
        from = "Column::QuestionId",
        to = "super::question::Column::Id",
        on_delete = "Cascade"
    )]
    Question,

    #[sea_orm(
        belongs_to = "super::comment::Entity",
        from = "Column::CommentId",
        to = "super::comment::Column::Id",
        on_delete = "Cascade"
    )]
    Comment,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reporter.def()
    }
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
