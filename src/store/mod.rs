//! Persistence seams for complaints and users.
//!
//! Services only talk to these traits. `mongo` is the production backend,
//! `memory` backs local runs with `STORAGE=memory` and the test suite.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Complaint, ComplaintStatus, Role, User};

pub use memory::{InMemoryComplaintStore, InMemoryUserStore};
pub use mongo::{MongoComplaintStore, MongoUserStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("duplicate key: {0}")]
    Duplicate(String),
}

#[async_trait]
pub trait ComplaintStore: Send + Sync {
    async fn insert(&self, complaint: Complaint) -> Result<Complaint, StoreError>;

    /// Every complaint, newest first.
    async fn find_all(&self) -> Result<Vec<Complaint>, StoreError>;

    /// Complaints submitted by `user_id`, newest first.
    async fn find_by_submitter(&self, user_id: &str) -> Result<Vec<Complaint>, StoreError>;

    /// `None` when missing or when `id` is not a valid identifier.
    async fn find_by_id(&self, id: &str) -> Result<Option<Complaint>, StoreError>;

    /// Sets the status and bumps `updated_at`. Returns the updated record.
    async fn update_status(
        &self,
        id: &str,
        status: ComplaintStatus,
    ) -> Result<Option<Complaint>, StoreError>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `StoreError::Duplicate` when username or email is taken.
    async fn insert(&self, user: User) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;

    /// Looks up by username, or by email when `login` contains an `@`.
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<User>, StoreError>;

    async fn exists(&self, username: &str, email: &str) -> Result<bool, StoreError>;

    /// All users, or only those with `role` when given.
    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, StoreError>;
}
