use crate::models::{Role, UserResponse};
use crate::services::auth_service::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::AppError;

/// Lists accounts without their credential hashes. Admin only.
pub async fn list_users(
    state: &AppState,
    caller: &AuthenticatedUser,
    role: Option<Role>,
) -> Result<Vec<UserResponse>, AppError> {
    if !state.policy.can_administer(caller) {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    let users = state.users.list(role).await?;
    Ok(users.into_iter().map(UserResponse::from).collect())
}
