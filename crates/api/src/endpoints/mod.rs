//! API endpoints.

mod auth;
mod comments;
mod courses;
mod dashboard;
mod questions;
mod reports;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/questions", questions::router())
        .nest("/comments", comments::router())
        .nest("/reports", reports::router())
        .nest("/courses", courses::router())
        .nest("/users", users::router())
        .nest("/dashboard", dashboard::router())
}
