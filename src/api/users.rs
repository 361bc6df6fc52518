use actix_web::{web, HttpResponse};

use crate::models::{Role, UserResponse};
use crate::services::{user_service, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::AppError;

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users, credentials excluded", body = [UserResponse]),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    log::info!("👥 GET /users - admin: {}", user.id);

    let users = user_service::list_users(&state, &user, None).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/students",
    tag = "Users",
    responses(
        (status = 200, description = "Student accounts, credentials excluded", body = [UserResponse]),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_students(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    log::info!("🎓 GET /users/students - admin: {}", user.id);

    let students = user_service::list_users(&state, &user, Some(Role::Student)).await?;
    Ok(HttpResponse::Ok().json(students))
}
