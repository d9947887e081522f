//! Create question like table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QuestionLike::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuestionLike::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QuestionLike::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(QuestionLike::QuestionId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(QuestionLike::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_like_user")
                            .from(QuestionLike::Table, QuestionLike::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_like_question")
                            .from(QuestionLike::Table, QuestionLike::QuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, question_id) - one like per user per question
        manager
            .create_index(
                Index::create()
                    .name("idx_question_like_user_question")
                    .table(QuestionLike::Table)
                    .col(QuestionLike::UserId)
                    .col(QuestionLike::QuestionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: question_id (for counting likes on a question)
        manager
            .create_index(
                Index::create()
                    .name("idx_question_like_question_id")
                    .table(QuestionLike::Table)
                    .col(QuestionLike::QuestionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuestionLike::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum QuestionLike {
    Table,
    Id,
    UserId,
    QuestionId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Question {
    Table,
    Id,
}
