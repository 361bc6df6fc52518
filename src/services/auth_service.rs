use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtSettings;
use crate::models::{LoginRequest, RegisterRequest, Role, User, UserResponse};
use crate::state::AppState;
use crate::store::StoreError;
use crate::utils::AppError;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub name: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
    pub aud: String,
    pub iss: String,
}

/// Identity attached to a request once its bearer token checks out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        AuthenticatedUser {
            id: claims.sub,
            name: claims.name,
            role: claims.role,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserResponse,
}

/// Issues and validates HS256 bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            encoding: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding: DecodingKey::from_secret(settings.secret.as_bytes()),
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            ttl: Duration::try_hours(settings.ttl_hours).unwrap_or_else(|| Duration::hours(24)),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal("Token lifetime overflows".to_string()))?;
        let claims = Claims {
            sub: user.id.to_hex(),
            name: user.name.clone(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: expires.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            aud: self.audience.clone(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Token rejected: {}", e);
                AppError::Unauthorized("Token is not valid".to_string())
            })
    }
}

pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

async fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();
    tokio::task::spawn_blocking(move || verify(password, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))
}

/// Creates a student account and signs it in.
pub async fn register(state: &AppState, request: &RegisterRequest) -> Result<AuthResponse, AppError> {
    let registration = request.validate().map_err(AppError::Validation)?;

    if state
        .users
        .exists(&registration.username, &registration.email)
        .await?
    {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password_hash = hash_password(&registration.password, state.bcrypt_cost).await?;
    let user = User::new(
        &registration.name,
        &registration.username,
        &registration.email,
        password_hash,
        Role::Student,
    );

    // A concurrent registration can still win the race on the unique index
    let user = state.users.insert(user).await.map_err(|e| match e {
        StoreError::Duplicate(_) => AppError::Conflict("User already exists".to_string()),
        other => other.into(),
    })?;

    log::info!("✅ User registered: {} ({})", user.username, user.id.to_hex());

    Ok(AuthResponse {
        success: true,
        token: state.tokens.issue(&user)?,
        user: user.into(),
    })
}

pub async fn login(state: &AppState, request: &LoginRequest) -> Result<AuthResponse, AppError> {
    let (login, password) = request.validate().map_err(AppError::Validation)?;
    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

    let user = state.users.find_by_login(&login).await?.ok_or_else(invalid)?;

    if !verify_password(&password, &user.password).await? {
        return Err(invalid());
    }

    Ok(AuthResponse {
        success: true,
        token: state.tokens.issue(&user)?,
        user: user.into(),
    })
}

pub async fn current_user(state: &AppState, caller: &AuthenticatedUser) -> Result<UserResponse, AppError> {
    state
        .users
        .find_by_id(&caller.id)
        .await?
        .map(UserResponse::from)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;

    fn settings(secret: &str, issuer: &str) -> JwtSettings {
        JwtSettings {
            secret: secret.to_string(),
            issuer: issuer.to_string(),
            audience: "complaint-api".to_string(),
            ttl_hours: 1,
        }
    }

    fn user(role: Role) -> User {
        User::new("Jane", "jane", "jane@example.com", "hash".into(), role)
    }

    fn register_request(username: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some("Jane Doe".into()),
            username: Some(username.into()),
            email: Some(format!("{}@example.com", username)),
            password: Some("secret123".into()),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let tokens = TokenService::new(&settings("s3cret", "complaint-service"));
        let admin = user(Role::Admin);

        let claims = tokens.verify(&tokens.issue(&admin).unwrap()).unwrap();
        assert_eq!(claims.sub, admin.id.to_hex());
        assert_eq!(claims.role, Role::Admin);

        let caller = AuthenticatedUser::from(claims);
        assert!(caller.is_admin());
    }

    #[test]
    fn test_token_from_other_secret_or_issuer_is_rejected() {
        let ours = TokenService::new(&settings("s3cret", "complaint-service"));
        let other_secret = TokenService::new(&settings("another", "complaint-service"));
        let other_issuer = TokenService::new(&settings("s3cret", "someone-else"));

        let token = other_secret.issue(&user(Role::Student)).unwrap();
        assert!(matches!(ours.verify(&token), Err(AppError::Unauthorized(_))));

        let token = other_issuer.issue(&user(Role::Student)).unwrap();
        assert!(ours.verify(&token).is_err());

        assert!(ours.verify("not.a.jwt").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut expired = settings("s3cret", "complaint-service");
        expired.ttl_hours = -2;
        let tokens = TokenService::new(&expired);

        let token = tokens.issue(&user(Role::Student)).unwrap();
        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn test_overflowing_lifetime_is_an_error() {
        let mut endless = settings("s3cret", "complaint-service");
        endless.ttl_hours = 10_000_000_000;
        let tokens = TokenService::new(&endless);

        assert!(matches!(tokens.issue(&user(Role::Student)), Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let state = test_state();

        let registered = register(&state, &register_request("jane")).await.unwrap();
        assert_eq!(registered.user.role, Role::Student);
        assert!(state.tokens.verify(&registered.token).is_ok());

        let by_username = LoginRequest {
            username: Some("jane".into()),
            password: Some("secret123".into()),
        };
        let logged_in = login(&state, &by_username).await.unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);

        let by_email = LoginRequest {
            username: Some("jane@example.com".into()),
            password: Some("secret123".into()),
        };
        assert!(login(&state, &by_email).await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let state = test_state();
        register(&state, &register_request("jane")).await.unwrap();

        let err = register(&state, &register_request("jane")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let state = test_state();
        register(&state, &register_request("jane")).await.unwrap();

        let request = LoginRequest {
            username: Some("jane".into()),
            password: Some("wrong-password".into()),
        };
        assert!(matches!(login(&state, &request).await, Err(AppError::Unauthorized(_))));

        let unknown = LoginRequest {
            username: Some("nobody".into()),
            password: Some("secret123".into()),
        };
        assert!(matches!(login(&state, &unknown).await, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_current_user() {
        let state = test_state();
        let registered = register(&state, &register_request("jane")).await.unwrap();
        let caller = AuthenticatedUser::from(state.tokens.verify(&registered.token).unwrap());

        let me = current_user(&state, &caller).await.unwrap();
        assert_eq!(me.username, "jane");
    }
}
