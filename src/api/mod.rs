pub mod auth;
pub mod complaints;
pub mod health;
pub mod swagger;
pub mod users;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::middleware::AuthMiddleware;
use crate::utils::AppError;

/// Malformed JSON bodies get the same error envelope as everything else.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            AppError::BadRequest(err.to_string()).into()
        })
}

/// Registers every route. Shared by `main` and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login))
                .service(
                    web::resource("/user")
                        .wrap(AuthMiddleware::authenticated())
                        .route(web::get().to(auth::get_user)),
                ),
        )
        .service(
            web::scope("/api/complaints")
                .wrap(AuthMiddleware::authenticated())
                .route("", web::post().to(complaints::create_complaint))
                .route("", web::get().to(complaints::list_complaints))
                .route("/{id}", web::get().to(complaints::get_complaint))
                .route("/{id}", web::delete().to(complaints::delete_complaint))
                .service(
                    web::resource("/{id}/status")
                        .wrap(AuthMiddleware::admin())
                        .route(web::put().to(complaints::update_status)),
                ),
        )
        .service(
            web::scope("/api/users")
                .wrap(AuthMiddleware::admin())
                .route("", web::get().to(users::list_users))
                .route("/students", web::get().to(users::list_students)),
        );
}
