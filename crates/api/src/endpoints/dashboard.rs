//! Dashboard endpoints.

use axum::{Json, Router, extract::State, routing::get};
use studyhub_common::{AppError, AppResult};
use studyhub_core::{AdminDashboard, UserDashboard, authz};

use crate::{extractors::AuthUser, middleware::AppState};

/// The signed-in user's activity over the trailing week.
async fn me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<UserDashboard>> {
    let dashboard = state.dashboard_service.my_activity(&user.id).await?;

    Ok(Json(dashboard))
}

/// Site-wide activity over the trailing week (moderators only).
async fn admin(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<AdminDashboard>> {
    if !authz::can_moderate(&user) {
        return Err(AppError::Forbidden(
            "Moderator capability required".to_string(),
        ));
    }

    let dashboard = state.dashboard_service.admin_overview().await?;

    Ok(Json(dashboard))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/admin", get(admin))
}
