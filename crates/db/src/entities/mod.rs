//! Database entities.

pub mod bookmark;
pub mod comment;
pub mod comment_like;
pub mod course;
pub mod question;
pub mod question_like;
pub mod report;
pub mod user;

pub use bookmark::Entity as Bookmark;
pub use comment::Entity as Comment;
pub use comment_like::Entity as CommentLike;
pub use course::Entity as Course;
pub use question::Entity as Question;
pub use question_like::Entity as QuestionLike;
pub use report::Entity as Report;
pub use user::Entity as User;
