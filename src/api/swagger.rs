use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Complaint Service API",
        version = "1.0.0",
        description = "Complaint tracking for students and administrators.\n\n**Authentication:** every endpoint except `/health`, `/api/auth/register` and `/api/auth/login` requires a JWT Bearer token.\n\n**Roles:** students see and manage their own complaints. Admins see all complaints, change their status and list users."
    ),
    paths(
        // Auth
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::get_user,

        // Health
        crate::api::health::health_check,

        // Complaints
        crate::api::complaints::create_complaint,
        crate::api::complaints::list_complaints,
        crate::api::complaints::get_complaint,
        crate::api::complaints::update_status,
        crate::api::complaints::delete_complaint,

        // Users
        crate::api::users::list_users,
        crate::api::users::list_students,
    ),
    components(
        schemas(
            crate::models::RegisterRequest,
            crate::models::LoginRequest,
            crate::models::UserResponse,
            crate::models::Role,
            crate::services::auth_service::AuthResponse,

            crate::models::CreateComplaintRequest,
            crate::models::UpdateStatusRequest,
            crate::models::ComplaintResponse,
            crate::models::ComplaintStatus,
            crate::models::SubmittedBy,
            crate::models::SubmitterInfo,
            crate::services::complaint_service::DeleteResponse,

            crate::utils::FieldError,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and the current user."),
        (name = "Complaints", description = "Submit complaints and follow their status."),
        (name = "Users", description = "Account listings for administrators."),
        (name = "Health", description = "Liveness and database connectivity."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /api/auth/login"))
                        .build()
                ),
            );
        }
    }
}
