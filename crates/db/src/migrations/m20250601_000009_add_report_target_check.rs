//! Enforce that a report targets exactly one of question / comment.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One and only one target column may be set.
        manager
            .get_connection()
            .execute_unprepared(
                r"
                ALTER TABLE report
                ADD CONSTRAINT chk_report_single_target
                CHECK (
                    (question_id IS NOT NULL AND comment_id IS NULL)
                    OR (question_id IS NULL AND comment_id IS NOT NULL)
                );
                ",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "ALTER TABLE report DROP CONSTRAINT IF EXISTS chk_report_single_target;",
            )
            .await?;

        Ok(())
    }
}
