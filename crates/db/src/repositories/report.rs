//! Report repository.

use std::sync::Arc;

use crate::entities::{
    Comment, Question, Report, comment, question,
    report::{self, ReportReason, ReportStatus},
};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Statement, TransactionTrait,
    prelude::DateTimeWithTimeZone, sea_query::Expr,
};
use studyhub_common::{AppError, AppResult};

/// One row of the admin report listing, with the reporter and target
/// joined in.
#[derive(Debug, Clone, FromQueryResult)]
pub struct ReportAdminRow {
    pub id: String,
    pub reporter_id: String,
    pub reporter_email: String,
    pub question_id: Option<String>,
    pub question_text: Option<String>,
    pub comment_id: Option<String>,
    pub comment_text: Option<String>,
    pub reason: ReportReason,
    pub description: Option<String>,
    pub status: ReportStatus,
    pub action_taken: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub resolved_at: Option<DateTimeWithTimeZone>,
}

/// Report repository for database operations.
#[derive(Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a report by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<report::Model>> {
        Report::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a report by ID, failing when missing.
    pub async fn get_by_id(&self, id: &str) -> AppResult<report::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {id} not found")))
    }

    /// Find a report by reporter and question.
    pub async fn find_by_reporter_and_question(
        &self,
        reporter_id: &str,
        question_id: &str,
    ) -> AppResult<Option<report::Model>> {
        Report::find()
            .filter(report::Column::ReporterId.eq(reporter_id))
            .filter(report::Column::QuestionId.eq(question_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a report by reporter and comment.
    pub async fn find_by_reporter_and_comment(
        &self,
        reporter_id: &str,
        comment_id: &str,
    ) -> AppResult<Option<report::Model>> {
        Report::find()
            .filter(report::Column::ReporterId.eq(reporter_id))
            .filter(report::Column::CommentId.eq(comment_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a report and bump the target's report counter inside the
    /// same transaction.
    pub async fn create(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let created = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if let Some(question_id) = &created.question_id {
            Question::update_many()
                .col_expr(
                    question::Column::ReportsCount,
                    Expr::col(question::Column::ReportsCount).add(1),
                )
                .filter(question::Column::Id.eq(question_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        if let Some(comment_id) = &created.comment_id {
            Comment::update_many()
                .col_expr(
                    comment::Column::ReportsCount,
                    Expr::col(comment::Column::ReportsCount).add(1),
                )
                .filter(comment::Column::Id.eq(comment_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(created)
    }

    /// Update a report.
    pub async fn update(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List reports with an optional status filter (paginated, newest
    /// first).
    pub async fn list(
        &self,
        status: Option<ReportStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<report::Model>> {
        let mut query = Report::find().order_by_desc(report::Column::CreatedAt);

        if let Some(s) = status {
            query = query.filter(report::Column::Status.eq(s));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Admin listing with reporter email and target text joined in.
    pub async fn list_admin(
        &self,
        status: Option<ReportStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<ReportAdminRow>> {
        let where_clause = if status.is_some() {
            "WHERE r.status = $3"
        } else {
            ""
        };

        let sql = format!(
            r#"
            SELECT
                r.id, r.reporter_id, u.email AS reporter_email,
                r.question_id, q.text AS question_text,
                r.comment_id, c.text AS comment_text,
                r.reason, r.description, r.status, r.action_taken,
                r.created_at, r.resolved_at
            FROM report r
            INNER JOIN "user" u ON u.id = r.reporter_id
            LEFT JOIN question q ON q.id = r.question_id
            LEFT JOIN comment c ON c.id = r.comment_id
            {where_clause}
            ORDER BY r.created_at DESC
            LIMIT $1 OFFSET $2
            "#
        );

        let mut values: Vec<sea_orm::Value> =
            vec![(limit as i64).into(), (offset as i64).into()];
        if let Some(s) = status {
            values.push(s.to_value().into());
        }

        ReportAdminRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            &sql,
            values,
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_report(id: &str, reporter_id: &str, question_id: &str) -> report::Model {
        report::Model {
            id: id.to_string(),
            reporter_id: reporter_id.to_string(),
            question_id: Some(question_id.to_string()),
            comment_id: None,
            reason: ReportReason::Spam,
            description: None,
            status: ReportStatus::Pending,
            action_taken: None,
            created_at: Utc::now().into(),
            resolved_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_bumps_question_counter() {
        let report = create_test_report("r1", "u1", "q1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let model = report::ActiveModel {
            id: sea_orm::Set("r1".to_string()),
            reporter_id: sea_orm::Set("u1".to_string()),
            question_id: sea_orm::Set(Some("q1".to_string())),
            comment_id: sea_orm::Set(None),
            reason: sea_orm::Set(ReportReason::Spam),
            description: sea_orm::Set(None),
            status: sea_orm::Set(ReportStatus::Pending),
            action_taken: sea_orm::Set(None),
            created_at: sea_orm::Set(Utc::now().into()),
            resolved_at: sea_orm::Set(None),
        };
        let created = repo.create(model).await.unwrap();

        assert_eq!(created.id, "r1");
        assert_eq!(created.status, ReportStatus::Pending);
    }

    #[tokio::test]
    async fn test_find_by_reporter_and_question_found() {
        let report = create_test_report("r1", "u1", "q1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report]])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let result = repo
            .find_by_reporter_and_question("u1", "q1")
            .await
            .unwrap();

        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let r1 = create_test_report("r1", "u1", "q1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1]])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let result = repo
            .list(Some(ReportStatus::Pending), 10, 0)
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<report::Model>::new()])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
