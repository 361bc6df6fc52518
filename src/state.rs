use std::sync::Arc;

use crate::config::Config;
use crate::database::MongoDB;
use crate::services::{AccessPolicy, RoleOwnershipPolicy, TokenService};
use crate::store::{
    ComplaintStore, InMemoryComplaintStore, InMemoryUserStore, MongoComplaintStore, MongoUserStore,
    UserStore,
};

/// Shared handles passed to every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub complaints: Arc<dyn ComplaintStore>,
    pub users: Arc<dyn UserStore>,
    pub policy: Arc<dyn AccessPolicy>,
    pub tokens: TokenService,
    pub bcrypt_cost: u32,
    /// Present when backed by MongoDB; used by the health check.
    pub mongo: Option<MongoDB>,
}

impl AppState {
    pub fn with_mongodb(db: MongoDB, config: &Config) -> Self {
        Self {
            complaints: Arc::new(MongoComplaintStore::new(&db)),
            users: Arc::new(MongoUserStore::new(&db)),
            policy: Arc::new(RoleOwnershipPolicy),
            tokens: TokenService::new(&config.jwt),
            bcrypt_cost: config.bcrypt_cost,
            mongo: Some(db),
        }
    }

    pub fn in_memory(config: &Config) -> Self {
        Self {
            complaints: Arc::new(InMemoryComplaintStore::new()),
            users: Arc::new(InMemoryUserStore::new()),
            policy: Arc::new(RoleOwnershipPolicy),
            tokens: TokenService::new(&config.jwt),
            bcrypt_cost: config.bcrypt_cost,
            mongo: None,
        }
    }
}

/// In-memory state with the cheapest bcrypt cost, for tests.
#[cfg(test)]
pub fn test_state() -> AppState {
    let config = Config::from_lookup(|key| match key {
        "STORAGE" => Some("memory".to_string()),
        "BCRYPT_COST" => Some("4".to_string()),
        "JWT_SECRET" => Some("test-secret".to_string()),
        _ => None,
    })
    .expect("test config is valid");
    AppState::in_memory(&config)
}
