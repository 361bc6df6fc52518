use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// A single field-level validation failure, returned to the client as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_authorized() -> Self {
        AppError::Unauthorized("Not authorized".to_string())
    }

    pub fn complaint_not_found() -> Self {
        AppError::NotFound("Complaint not found".to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            AppError::Validation(errors) => HttpResponse::build(status).json(serde_json::json!({
                "success": false,
                "message": self.to_string(),
                "errors": errors
            })),
            // Never leak persistence details to the client
            AppError::Store(_) | AppError::Internal(_) => {
                log::error!("❌ {}", self);
                HttpResponse::build(status).json(serde_json::json!({
                    "success": false,
                    "message": "Server error"
                }))
            }
            _ => HttpResponse::build(status).json(serde_json::json!({
                "success": false,
                "message": self.to_string()
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Validation(vec![]).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::not_authorized().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::complaint_not_found().status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_internal_error_hides_details() {
        let response = AppError::Internal("connection refused at 10.0.0.3".into()).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["message"], "Server error");
        assert!(!body.windows(7).any(|w| w == b"10.0.0."));
    }

    #[actix_web::test]
    async fn test_error_text_is_under_message() {
        let response = AppError::complaint_not_found().error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Complaint not found");
        assert!(json.get("error").is_none());
    }

    #[actix_web::test]
    async fn test_validation_error_lists_fields() {
        let response = AppError::Validation(vec![
            FieldError::new("name", "Name is required"),
            FieldError::new("email", "Please include a valid email"),
        ])
        .error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["errors"][0]["field"], "name");
        assert_eq!(json["errors"][1]["message"], "Please include a valid email");
    }
}
