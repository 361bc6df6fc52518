use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use tokio::sync::RwLock;

use super::{ComplaintStore, StoreError, UserStore};
use crate::models::{Complaint, ComplaintStatus, Role, User};

fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

fn newest_first(mut complaints: Vec<Complaint>) -> Vec<Complaint> {
    // ObjectIds grow monotonically, so they break ties within one millisecond
    complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    complaints
}

#[derive(Default)]
pub struct InMemoryComplaintStore {
    complaints: RwLock<Vec<Complaint>>,
}

impl InMemoryComplaintStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ComplaintStore for InMemoryComplaintStore {
    async fn insert(&self, complaint: Complaint) -> Result<Complaint, StoreError> {
        let mut complaints = self.complaints.write().await;
        if complaints.iter().any(|c| c.id == complaint.id) {
            return Err(StoreError::Duplicate(format!("complaint {}", complaint.id)));
        }
        complaints.push(complaint.clone());
        Ok(complaint)
    }

    async fn find_all(&self) -> Result<Vec<Complaint>, StoreError> {
        Ok(newest_first(self.complaints.read().await.clone()))
    }

    async fn find_by_submitter(&self, user_id: &str) -> Result<Vec<Complaint>, StoreError> {
        let complaints = self.complaints.read().await;
        Ok(newest_first(
            complaints
                .iter()
                .filter(|c| c.is_submitted_by(user_id))
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Complaint>, StoreError> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        let complaints = self.complaints.read().await;
        Ok(complaints.iter().find(|c| c.id == oid).cloned())
    }

    async fn update_status(
        &self,
        id: &str,
        status: ComplaintStatus,
    ) -> Result<Option<Complaint>, StoreError> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        let mut complaints = self.complaints.write().await;
        Ok(complaints.iter_mut().find(|c| c.id == oid).map(|c| {
            c.status = status;
            c.updated_at = BsonDateTime::now();
            c.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let Some(oid) = parse_id(id) else {
            return Ok(false);
        };
        let mut complaints = self.complaints.write().await;
        let before = complaints.len();
        complaints.retain(|c| c.id != oid);
        Ok(complaints.len() < before)
    }
}

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(StoreError::Duplicate(format!("user {}", user.username)));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        Ok(self.users.read().await.iter().find(|u| u.id == oid).cloned())
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        let found = if login.contains('@') {
            let email = login.to_lowercase();
            users.iter().find(|u| u.email == email)
        } else {
            users.iter().find(|u| u.username == login)
        };
        Ok(found.cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<User>, StoreError> {
        let wanted: Vec<ObjectId> = ids.iter().filter_map(|id| parse_id(id)).collect();
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| wanted.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn exists(&self, username: &str, email: &str) -> Result<bool, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().any(|u| u.username == username || u.email == email))
    }

    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .cloned()
            .collect())
    }
}
