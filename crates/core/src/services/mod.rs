//! Business logic services.

#![allow(missing_docs)]

pub mod auth;
pub mod bookmark;
pub mod comment;
pub mod course;
pub mod dashboard;
pub mod email;
pub mod like;
pub mod question;
pub mod report;
pub mod user;

pub use auth::{AuthService, Claims, RequestMagicLinkInput, VerifyMagicLinkInput};
pub use bookmark::BookmarkService;
pub use comment::{CommentService, CreateCommentInput};
pub use course::{CourseService, CreateCourseInput};
pub use dashboard::{
    AdminDashboard, DailyBucket, DashboardService, UserDashboard, fill_daily_buckets,
};
pub use email::EmailService;
pub use like::{LikeService, LikeToggleResult};
pub use question::{CreateQuestionInput, QuestionService};
pub use report::{CreateReportInput, ReportService, UpdateReportStatusInput};
pub use user::{BlockUserInput, ChangeRoleInput, UserService};
