//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use studyhub_core::{
    AuthService, BookmarkService, CommentService, CourseService, DashboardService, LikeService,
    QuestionService, ReportService, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub course_service: CourseService,
    pub question_service: QuestionService,
    pub comment_service: CommentService,
    pub like_service: LikeService,
    pub bookmark_service: BookmarkService,
    pub report_service: ReportService,
    pub dashboard_service: DashboardService,
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` into a user stored on the
/// request extensions. Requests without the header pass through
/// anonymously; a header that fails validation short-circuits with the
/// auth error, so blocked accounts see 403 rather than 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.auth_service.authenticate(token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(err) => return err.into_response(),
        }
    }

    next.run(req).await
}
