//! Database repositories.

pub mod bookmark;
pub mod comment;
pub mod course;
pub mod like;
pub mod question;
pub mod report;
pub mod stats;
pub mod user;

pub use bookmark::BookmarkRepository;
pub use comment::CommentRepository;
pub use course::CourseRepository;
pub use like::LikeRepository;
pub use question::QuestionRepository;
pub use report::{ReportAdminRow, ReportRepository};
pub use stats::{DayCount, StatsRepository};
pub use user::UserRepository;
