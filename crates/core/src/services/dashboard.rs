//! Dashboard service.
//!
//! Activity summaries over a trailing window of days. The repository
//! returns only days that had rows; the service fills the gaps with
//! zeroes so charts always render a full window.

use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use studyhub_common::AppResult;
use studyhub_db::repositories::{DayCount, StatsRepository};

/// Length of the activity window, in days, including today.
const TRAILING_DAYS: i64 = 7;

/// One day of activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub count: i64,
}

/// Activity summary for one user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDashboard {
    pub questions: Vec<DailyBucket>,
    pub bookmarks: Vec<DailyBucket>,
}

/// Site-wide activity summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub users: Vec<DailyBucket>,
    pub questions: Vec<DailyBucket>,
}

/// Expand sparse per-day counts into a dense window starting at `start`.
/// Days without a row get a zero; rows outside the window are ignored.
#[must_use]
pub fn fill_daily_buckets(start: NaiveDate, days: i64, rows: &[DayCount]) -> Vec<DailyBucket> {
    (0..days)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let count = rows
                .iter()
                .find(|row| row.day == date)
                .map_or(0, |row| row.count);
            DailyBucket { date, count }
        })
        .collect()
}

/// Dashboard service.
#[derive(Clone)]
pub struct DashboardService {
    stats_repo: StatsRepository,
}

impl DashboardService {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(stats_repo: StatsRepository) -> Self {
        Self { stats_repo }
    }

    fn window() -> (NaiveDate, chrono::DateTime<Utc>) {
        let today = Utc::now().date_naive();
        let start = today - Duration::days(TRAILING_DAYS - 1);
        let since = start.and_time(chrono::NaiveTime::MIN).and_utc();
        (start, since)
    }

    /// Question and bookmark activity for one user over the trailing week.
    pub async fn my_activity(&self, user_id: &str) -> AppResult<UserDashboard> {
        let (start, since) = Self::window();

        let questions = self
            .stats_repo
            .questions_per_day_for_user(user_id, since)
            .await?;
        let bookmarks = self
            .stats_repo
            .bookmarks_per_day_for_user(user_id, since)
            .await?;

        Ok(UserDashboard {
            questions: fill_daily_buckets(start, TRAILING_DAYS, &questions),
            bookmarks: fill_daily_buckets(start, TRAILING_DAYS, &bookmarks),
        })
    }

    /// Signup and question activity across the site over the trailing week.
    pub async fn admin_overview(&self) -> AppResult<AdminDashboard> {
        let (start, since) = Self::window();

        let users = self.stats_repo.user_signups_per_day(since).await?;
        let questions = self.stats_repo.questions_per_day(since).await?;

        Ok(AdminDashboard {
            users: fill_daily_buckets(start, TRAILING_DAYS, &users),
            questions: fill_daily_buckets(start, TRAILING_DAYS, &questions),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_fill_empty_rows_is_all_zeroes() {
        let buckets = fill_daily_buckets(date("2025-03-01"), 7, &[]);

        assert_eq!(buckets.len(), 7);
        assert!(buckets.iter().all(|b| b.count == 0));
        assert_eq!(buckets[0].date, date("2025-03-01"));
        assert_eq!(buckets[6].date, date("2025-03-07"));
    }

    #[test]
    fn test_fill_maps_counts_onto_days() {
        let rows = vec![
            DayCount {
                day: date("2025-03-02"),
                count: 3,
            },
            DayCount {
                day: date("2025-03-05"),
                count: 1,
            },
        ];

        let buckets = fill_daily_buckets(date("2025-03-01"), 7, &rows);

        assert_eq!(buckets[1].count, 3);
        assert_eq!(buckets[4].count, 1);
        assert_eq!(
            buckets.iter().map(|b| b.count).sum::<i64>(),
            4,
            "other days stay zero"
        );
    }

    #[test]
    fn test_fill_ignores_rows_outside_window() {
        let rows = vec![DayCount {
            day: date("2025-02-20"),
            count: 9,
        }];

        let buckets = fill_daily_buckets(date("2025-03-01"), 7, &rows);

        assert!(buckets.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_buckets_are_in_ascending_order() {
        let buckets = fill_daily_buckets(date("2025-03-01"), 7, &[]);

        for pair in buckets.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }
}
