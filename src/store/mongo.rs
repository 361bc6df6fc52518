use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::ReturnDocument;
use mongodb::Collection;

use super::{ComplaintStore, StoreError, UserStore};
use crate::database::{MongoDB, COMPLAINTS, USERS};
use crate::models::{Complaint, ComplaintStatus, Role, User};

const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

#[derive(Clone)]
pub struct MongoComplaintStore {
    collection: Collection<Complaint>,
}

impl MongoComplaintStore {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            collection: db.collection(COMPLAINTS),
        }
    }

    async fn find_sorted(&self, filter: Document) -> Result<Vec<Complaint>, StoreError> {
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .await?;
        Ok(cursor.try_collect::<Vec<_>>().await?)
    }
}

#[async_trait]
impl ComplaintStore for MongoComplaintStore {
    async fn insert(&self, complaint: Complaint) -> Result<Complaint, StoreError> {
        match self.collection.insert_one(&complaint).await {
            Ok(_) => Ok(complaint),
            Err(e) if is_duplicate_key(&e) => {
                Err(StoreError::Duplicate(format!("complaint {}", complaint.id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_all(&self) -> Result<Vec<Complaint>, StoreError> {
        self.find_sorted(doc! {}).await
    }

    async fn find_by_submitter(&self, user_id: &str) -> Result<Vec<Complaint>, StoreError> {
        let Some(oid) = parse_id(user_id) else {
            return Ok(Vec::new());
        };
        self.find_sorted(doc! { "submittedBy": oid }).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Complaint>, StoreError> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        Ok(self.collection.find_one(doc! { "_id": oid }).await?)
    }

    async fn update_status(
        &self,
        id: &str,
        status: ComplaintStatus,
    ) -> Result<Option<Complaint>, StoreError> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        let update = doc! {
            "$set": {
                "status": status.as_str(),
                "updatedAt": BsonDateTime::now(),
            }
        };
        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": oid }, update)
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let Some(oid) = parse_id(id) else {
            return Ok(false);
        };
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[derive(Clone)]
pub struct MongoUserStore {
    collection: Collection<User>,
}

impl MongoUserStore {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            collection: db.collection(USERS),
        }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn insert(&self, user: User) -> Result<User, StoreError> {
        match self.collection.insert_one(&user).await {
            Ok(_) => Ok(user),
            Err(e) if is_duplicate_key(&e) => {
                Err(StoreError::Duplicate(format!("user {}", user.username)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        Ok(self.collection.find_one(doc! { "_id": oid }).await?)
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        let filter = if login.contains('@') {
            doc! { "email": login.to_lowercase() }
        } else {
            doc! { "username": login }
        };
        Ok(self.collection.find_one(filter).await?)
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<User>, StoreError> {
        let oids: Vec<ObjectId> = ids.iter().filter_map(|id| parse_id(id)).collect();
        if oids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self.collection.find(doc! { "_id": { "$in": oids } }).await?;
        Ok(cursor.try_collect::<Vec<_>>().await?)
    }

    async fn exists(&self, username: &str, email: &str) -> Result<bool, StoreError> {
        let filter = doc! {
            "$or": [
                { "username": username },
                { "email": email }
            ]
        };
        Ok(self.collection.count_documents(filter).await? > 0)
    }

    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, StoreError> {
        let filter = match role {
            Some(role) => doc! { "role": role.to_string() },
            None => doc! {},
        };
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "createdAt": 1 })
            .await?;
        Ok(cursor.try_collect::<Vec<_>>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ComplaintFields;

    async fn connect() -> MongoDB {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/complaints_test".to_string());
        MongoDB::new(&uri).await.unwrap()
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_complaint_status_round_trip() {
        let store = MongoComplaintStore::new(&connect().await);
        let complaint = Complaint::new(
            ComplaintFields {
                name: "Jane".into(),
                email: "jane@example.com".into(),
                contact: "555-0100".into(),
                description: "No hot water".into(),
            },
            &ObjectId::new().to_hex(),
        );
        let id = store.insert(complaint).await.unwrap().id.to_hex();

        let updated = store
            .update_status(&id, ComplaintStatus::InProgress)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, ComplaintStatus::InProgress);
        assert!(store.delete(&id).await.unwrap());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_duplicate_username_is_reported() {
        let store = MongoUserStore::new(&connect().await);
        let username = format!("dup-{}", ObjectId::new().to_hex());
        let first = User::new("A", &username, &format!("{}@a.com", username), "h".into(), Role::Student);
        let second = User::new("B", &username, &format!("{}@b.com", username), "h".into(), Role::Student);

        store.insert(first).await.unwrap();
        assert!(matches!(store.insert(second).await, Err(StoreError::Duplicate(_))));
    }
}
