//! Authorization capabilities.
//!
//! Every role check goes through these functions so handlers and services
//! share one definition of who may do what.

use studyhub_db::entities::user::{self, UserRole};

/// Whether the user is currently blocked from using the platform.
#[must_use]
pub fn is_blocked(user: &user::Model) -> bool {
    let now = chrono::Utc::now().fixed_offset();
    user.blocked_until.is_some_and(|until| until > now)
}

/// Whether the user may moderate content, reports and other users.
#[must_use]
pub fn can_moderate(user: &user::Model) -> bool {
    matches!(user.role, UserRole::Admin | UserRole::SuperAdmin) && !is_blocked(user)
}

/// Whether the user may delete a resource owned by `owner_id`.
#[must_use]
pub fn can_delete_owned(user: &user::Model, owner_id: &str) -> bool {
    user.id == owner_id || can_moderate(user)
}

/// Whether the user may change other users' roles.
#[must_use]
pub fn can_manage_roles(user: &user::Model) -> bool {
    user.role == UserRole::SuperAdmin && !is_blocked(user)
}
