//! Comment entity (threaded discussion under questions).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub question_id: String,

    /// The comment author
    pub user_id: String,

    #[sea_orm(column_type = "Text")]
    pub text: String,

    /// NULL = top-level comment, Some(id) = reply to another comment
    /// on the same question
    #[sea_orm(nullable)]
    pub parent_comment_id: Option<String>,

    /// Likes count (denormalized, equals the like-set cardinality)
    #[sea_orm(default_value = 0)]
    pub likes_count: i32,

    /// Reports count (denormalized, equals the report-set cardinality)
    #[sea_orm(default_value = 0)]
    pub reports_count: i32,

    /// Direct reply count (denormalized)
    #[sea_orm(default_value = 0)]
    pub replies_count: i32,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::question::Entity",
        from = "Column::QuestionId",
        to = "super::question::Column::Id",
        on_delete = "Cascade"
    )]
    Question,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentCommentId",
        to = "Column::Id",
        on_delete = "Cascade"
    )]
    Parent,
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
