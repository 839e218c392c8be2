//! Requester role checks. Identity arrives as a `user_id` and is resolved
//! against the users table on every request.

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{User, UserRole};
use crate::store::RecruitingStore;

/// Loads the requester. An unknown id is treated as unauthenticated.
pub async fn load_requester(store: &dyn RecruitingStore, user_id: Uuid) -> Result<User, AppError> {
    store
        .fetch_user(user_id)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// Loads the requester and checks that their role is one of `allowed`.
pub async fn require_role(
    store: &dyn RecruitingStore,
    user_id: Uuid,
    allowed: &[UserRole],
) -> Result<User, AppError> {
    let user = load_requester(store, user_id).await?;
    match user.role() {
        Some(role) if allowed.contains(&role) => Ok(user),
        _ => Err(AppError::Forbidden(format!(
            "This action requires one of the roles: {}",
            allowed
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}
