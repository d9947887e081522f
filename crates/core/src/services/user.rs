//! User service.

use chrono::{Duration, Utc};
use sea_orm::Set;
use serde::Deserialize;
use studyhub_common::{AppError, AppResult};
use studyhub_db::{
    entities::user::{self, UserRole},
    repositories::UserRepository,
};
use validator::Validate;

use crate::authz;

/// Block length applied when no duration is given.
const INDEFINITE_BLOCK_DAYS: i64 = 36500;

/// Input for blocking a user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BlockUserInput {
    /// Days to block for. Omitted means indefinitely.
    #[validate(range(min = 1, max = 36500))]
    pub days: Option<i64>,
}

/// Input for changing a user's role.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRoleInput {
    pub role: UserRole,
}

/// User service for profile and admin management.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Get a user by ID, failing when missing.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// List users (paginated, newest first).
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<user::Model>> {
        self.user_repo.list(limit, offset).await
    }

    /// Count all users.
    pub async fn count(&self) -> AppResult<u64> {
        self.user_repo.count().await
    }

    /// Block a user until a deadline, invalidating their sessions.
    pub async fn block(
        &self,
        actor: &user::Model,
        target_id: &str,
        input: BlockUserInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        if !authz::can_moderate(actor) {
            return Err(AppError::Forbidden(
                "Moderator capability required".to_string(),
            ));
        }
        if actor.id == target_id {
            return Err(AppError::BadRequest("Cannot block yourself".to_string()));
        }

        let target = self.user_repo.get_by_id(target_id).await?;
        if authz::can_moderate(&target) && !authz::can_manage_roles(actor) {
            return Err(AppError::Forbidden(
                "Cannot block another moderator".to_string(),
            ));
        }

        let now = Utc::now();
        let until = now + Duration::days(input.days.unwrap_or(INDEFINITE_BLOCK_DAYS));
        let next_version = target.session_version + 1;

        let mut active: user::ActiveModel = target.into();
        active.blocked_until = Set(Some(until.into()));
        active.session_version = Set(next_version);
        active.updated_at = Set(Some(now.into()));

        let blocked = self.user_repo.update(active).await?;
        tracing::info!(user_id = %blocked.id, until = %until, "User blocked");
        Ok(blocked)
    }

    /// Lift a user's block.
    pub async fn unblock(&self, actor: &user::Model, target_id: &str) -> AppResult<user::Model> {
        if !authz::can_moderate(actor) {
            return Err(AppError::Forbidden(
                "Moderator capability required".to_string(),
            ));
        }

        let target = self.user_repo.get_by_id(target_id).await?;
        if target.blocked_until.is_none() {
            return Err(AppError::BadRequest("User is not blocked".to_string()));
        }

        let mut active: user::ActiveModel = target.into();
        active.blocked_until = Set(None);
        active.updated_at = Set(Some(Utc::now().into()));

        let unblocked = self.user_repo.update(active).await?;
        tracing::info!(user_id = %unblocked.id, "User unblocked");
        Ok(unblocked)
    }

    /// Change a user's role. Super-admin only.
    pub async fn change_role(
        &self,
        actor: &user::Model,
        target_id: &str,
        input: ChangeRoleInput,
    ) -> AppResult<user::Model> {
        if !authz::can_manage_roles(actor) {
            return Err(AppError::Forbidden(
                "Super admin capability required".to_string(),
            ));
        }
        if actor.id == target_id {
            return Err(AppError::BadRequest(
                "Cannot change your own role".to_string(),
            ));
        }

        let target = self.user_repo.get_by_id(target_id).await?;

        let mut active: user::ActiveModel = target.into();
        active.role = Set(input.role);
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.user_repo.update(active).await?;
        tracing::info!(user_id = %updated.id, role = ?updated.role, "User role changed");
        Ok(updated)
    }
}
