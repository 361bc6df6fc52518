pub mod access;
pub mod auth_service;
pub mod complaint_service;
pub mod user_service;

pub use access::{AccessPolicy, RoleOwnershipPolicy};
pub use auth_service::{AuthenticatedUser, TokenService};
