//! In-memory user directory
//!
//! Backs `serve --ephemeral` bring-up and the test suites. Accounts live
//! only for the process lifetime.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NewUser, UserDirectory, UserRecord};
use crate::auth::models::Role;
use crate::error::{Error, Result};

#[derive(Clone, Default)]
pub struct MemoryDirectory {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(Error::UserExists(user.username));
        }

        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        users.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update_hash(&self, id: &str, new_hash: &str) -> Result<()> {
        let mut users = self.users.write().await;
        match users.get_mut(id) {
            Some(user) => {
                user.password_hash = new_hash.to_string();
                Ok(())
            }
            None => Err(Error::UserNotFound(id.to_string())),
        }
    }

    async fn update_role(&self, id: &str, role: Role) -> Result<()> {
        let mut users = self.users.write().await;
        match users.get_mut(id) {
            Some(user) => {
                user.role = role;
                Ok(())
            }
            None => Err(Error::UserNotFound(id.to_string())),
        }
    }

    async fn list(&self) -> Result<Vec<UserRecord>> {
        let users = self.users.read().await;
        let mut all: Vec<UserRecord> = users.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}
