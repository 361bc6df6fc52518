use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::services::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requirement {
    Authenticated,
    Admin,
}

/// Verifies the bearer token and stores the caller as `AuthenticatedUser`
/// in the request extensions. Handlers read it with `web::ReqData`.
pub struct AuthMiddleware {
    requirement: Requirement,
}

impl AuthMiddleware {
    /// Any valid token; 401 otherwise.
    pub fn authenticated() -> Self {
        Self {
            requirement: Requirement::Authenticated,
        }
    }

    /// Valid token of an admin; 401 without a token, 403 for other roles.
    pub fn admin() -> Self {
        Self {
            requirement: Requirement::Admin,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            requirement: self.requirement,
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    requirement: Requirement,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authorize(&req, self.requirement) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(e) => {
                log::warn!("🔒 {} {} rejected: {}", req.method(), req.path(), e);
                // Answer here so the rejection never reaches the handler
                let res = req.error_response(e).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}

fn authorize(req: &ServiceRequest, requirement: Requirement) -> Result<AuthenticatedUser, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("application state is not configured".to_string()))?;

    // An outer scope may already have authenticated this request
    let existing = req.extensions().get::<AuthenticatedUser>().cloned();
    let user = match existing {
        Some(user) => user,
        None => {
            let token = bearer_token(req.headers())?;
            AuthenticatedUser::from(state.tokens.verify(token)?)
        }
    };

    if requirement == Requirement::Admin && !state.policy.can_administer(&user) {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(user)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("No token, authorization denied".to_string()))?;

    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid token format".to_string()))
}
