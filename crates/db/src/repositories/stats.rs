//! Aggregate statistics queries for dashboards.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbBackend, FromQueryResult, Statement};
use studyhub_common::{AppError, AppResult};

/// Rows created on one day. Days with no rows are absent; the service
/// layer fills the gaps.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct DayCount {
    pub day: chrono::NaiveDate,
    pub count: i64,
}

/// Statistics repository for dashboard aggregations.
#[derive(Clone)]
pub struct StatsRepository {
    db: Arc<DatabaseConnection>,
}

impl StatsRepository {
    /// Create a new statistics repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// User signups per day since the given time.
    pub async fn user_signups_per_day(&self, since: DateTime<Utc>) -> AppResult<Vec<DayCount>> {
        let sql = r#"
            SELECT DATE(created_at) AS day, COUNT(*) AS count
            FROM "user"
            WHERE created_at >= $1
            GROUP BY DATE(created_at)
            ORDER BY day
        "#;

        DayCount::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [since.into()],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Questions created per day since the given time.
    pub async fn questions_per_day(&self, since: DateTime<Utc>) -> AppResult<Vec<DayCount>> {
        let sql = r"
            SELECT DATE(created_at) AS day, COUNT(*) AS count
            FROM question
            WHERE created_at >= $1
            GROUP BY DATE(created_at)
            ORDER BY day
        ";

        DayCount::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [since.into()],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Questions created by one user per day since the given time.
    pub async fn questions_per_day_for_user(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> AppResult<Vec<DayCount>> {
        let sql = r"
            SELECT DATE(created_at) AS day, COUNT(*) AS count
            FROM question
            WHERE user_id = $1 AND created_at >= $2
            GROUP BY DATE(created_at)
            ORDER BY day
        ";

        DayCount::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [user_id.into(), since.into()],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Bookmarks created by one user per day since the given time.
    pub async fn bookmarks_per_day_for_user(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> AppResult<Vec<DayCount>> {
        let sql = r"
            SELECT DATE(created_at) AS day, COUNT(*) AS count
            FROM bookmark
            WHERE user_id = $1 AND created_at >= $2
            GROUP BY DATE(created_at)
            ORDER BY day
        ";

        DayCount::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [user_id.into(), since.into()],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }
}
