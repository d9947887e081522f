//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use studyhub_common::AppError;
use studyhub_db::entities::user;

/// Authenticated user extractor.
///
/// Reads the user placed on the request extensions by the auth
/// middleware and rejects with 401 when absent.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
