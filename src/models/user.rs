use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::complaint::to_chrono;
use crate::utils::{FieldError, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => f.write_str("student"),
            Role::Admin => f.write_str("admin"),
        }
    }
}

/// User account (collection "users")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub username: String,
    pub email: String,
    /// bcrypt hash
    pub password: String,
    #[serde(default)]
    pub role: Role,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

impl User {
    pub fn new(name: &str, username: &str, email: &str, password_hash: String, role: Role) -> Self {
        let now = BsonDateTime::now();
        Self {
            id: ObjectId::new(),
            name: name.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password: password_hash,
            role,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Public view of a user; the credential hash is never part of it.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id.to_hex(),
            name: user.name,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: to_chrono(user.created_at),
            updated_at: to_chrono(user.updated_at),
        }
    }
}

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Validated registration input
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<Registration, Vec<FieldError>> {
        let mut v = Validator::new();
        let name = v.required("name", self.name.as_deref(), "Name is required");
        let username = v.required("username", self.username.as_deref(), "Username is required");
        if username.chars().any(char::is_whitespace) {
            v.push("username", "Username cannot contain spaces");
        } else if username.contains('@') {
            // Logins containing '@' are looked up by email
            v.push("username", "Username cannot contain '@'");
        }
        // Account emails are unique case-insensitively
        let email = v
            .email("email", self.email.as_deref(), "Please include a valid email")
            .to_lowercase();
        let password = v.min_len(
            "password",
            self.password.as_deref(),
            MIN_PASSWORD_LEN,
            "Please enter a password with 6 or more characters",
        );
        v.finish()?;

        Ok(Registration {
            name,
            username,
            email,
            password,
        })
    }
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    /// Username or email
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(String, String), Vec<FieldError>> {
        let mut v = Validator::new();
        let login = v.required("username", self.username.as_deref(), "Username is required");
        let password = v.required("password", self.password.as_deref(), "Password is required");
        v.finish()?;
        // The trimmed copy is only used for the presence check
        Ok((login, self.password.clone().unwrap_or(password)))
    }
}
