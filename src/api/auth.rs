use actix_web::{web, HttpResponse};

use crate::models::{LoginRequest, RegisterRequest, UserResponse};
use crate::services::auth_service::{self, AuthResponse};
use crate::services::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::AppError;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registration successful", body = AuthResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Username or email already in use")
    )
)]
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let username = request.username.as_deref().unwrap_or("N/A");
    log::info!("📝 POST /auth/register - username: {}", username);

    match auth_service::register(&state, &request).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", username, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let username = request.username.as_deref().unwrap_or("N/A");
    log::info!("🔐 POST /auth/login - username: {}", username);

    match auth_service::login(&state, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", username);
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", username, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/user",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 GET /auth/user - user: {} ({})", user.name, user.id);

    let me = auth_service::current_user(&state, &user).await?;
    Ok(HttpResponse::Ok().json(me))
}
