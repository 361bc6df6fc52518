use actix_web::{web, HttpResponse};

use crate::models::{ComplaintResponse, CreateComplaintRequest, UpdateStatusRequest};
use crate::services::complaint_service::{self, DeleteResponse};
use crate::services::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::AppError;

#[utoipa::path(
    post,
    path = "/api/complaints",
    tag = "Complaints",
    request_body = CreateComplaintRequest,
    responses(
        (status = 200, description = "Complaint created", body = ComplaintResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_complaint(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
    request: web::Json<CreateComplaintRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /complaints - user: {}", user.id);

    let complaint = complaint_service::create(&state, &user, &request).await?;
    Ok(HttpResponse::Ok().json(complaint))
}

#[utoipa::path(
    get,
    path = "/api/complaints",
    tag = "Complaints",
    responses(
        (status = 200, description = "All complaints for admins, own complaints otherwise", body = [ComplaintResponse]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_complaints(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /complaints - user: {} ({})", user.id, user.role);

    let complaints = complaint_service::list(&state, &user).await?;
    log::info!("✅ Listed {} complaints", complaints.len());
    Ok(HttpResponse::Ok().json(complaints))
}

#[utoipa::path(
    get,
    path = "/api/complaints/{id}",
    tag = "Complaints",
    params(("id" = String, Path, description = "Complaint id")),
    responses(
        (status = 200, description = "Complaint with submitter info", body = ComplaintResponse),
        (status = 401, description = "Not the submitter and not an admin"),
        (status = 404, description = "Complaint not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_complaint(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    log::info!("🔍 GET /complaints/{} - user: {}", id, user.id);

    let complaint = complaint_service::get_by_id(&state, &user, &id).await?;
    Ok(HttpResponse::Ok().json(complaint))
}

#[utoipa::path(
    put,
    path = "/api/complaints/{id}/status",
    tag = "Complaints",
    params(("id" = String, Path, description = "Complaint id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ComplaintResponse),
        (status = 400, description = "Status is not one of pending, in-progress, resolved"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Complaint not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_status(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    log::info!("🔄 PUT /complaints/{}/status - admin: {}", id, user.id);

    let complaint = complaint_service::update_status(&state, &user, &id, &request).await?;
    Ok(HttpResponse::Ok().json(complaint))
}

#[utoipa::path(
    delete,
    path = "/api/complaints/{id}",
    tag = "Complaints",
    params(("id" = String, Path, description = "Complaint id")),
    responses(
        (status = 200, description = "Complaint removed", body = DeleteResponse),
        (status = 401, description = "Not the submitter and not an admin"),
        (status = 404, description = "Complaint not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_complaint(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    log::info!("🗑️ DELETE /complaints/{} - user: {}", id, user.id);

    let response = complaint_service::delete(&state, &user, &id).await?;
    Ok(HttpResponse::Ok().json(response))
}
