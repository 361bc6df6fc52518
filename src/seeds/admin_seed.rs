use crate::config::AdminSeed;
use crate::models::{Role, User};
use crate::services::auth_service::hash_password;
use crate::state::AppState;
use crate::store::StoreError;
use crate::utils::AppError;

/// Creates the configured admin account unless the username or email is
/// already taken. Registration only ever yields students, so this is the
/// one way an admin comes into existence.
pub async fn seed_admin(state: &AppState, seed: &AdminSeed) -> Result<(), AppError> {
    let username = seed.username.trim();
    let email = seed.email.trim().to_lowercase();

    if state.users.exists(username, &email).await? {
        log::info!("👑 Admin seed: '{}' already exists, skipping", username);
        return Ok(());
    }

    let password_hash = hash_password(&seed.password, state.bcrypt_cost).await?;
    let admin = User::new(seed.name.trim(), username, &email, password_hash, Role::Admin);

    match state.users.insert(admin).await {
        Ok(user) => {
            log::info!("   ✅ Seeded admin account '{}' ({})", user.username, user.id.to_hex());
            Ok(())
        }
        // Another instance seeded it first
        Err(StoreError::Duplicate(_)) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
