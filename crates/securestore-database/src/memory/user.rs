//! In-memory user store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use securestore_core::error::AppError;
use securestore_core::result::AppResult;
use securestore_entity::user::{CreateUser, User};

use crate::store::UserStore;

/// User store keeping accounts in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<DashMap<Uuid, User>>,
    usernames: Arc<DashMap<String, Uuid>>,
    emails: Arc<DashMap<String, Uuid>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let id = Uuid::now_v7();
        match self.usernames.entry(data.username.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::conflict("Username or email already registered"));
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }
        match self.emails.entry(data.email.clone()) {
            Entry::Occupied(_) => {
                self.usernames.remove(&data.username);
                return Err(AppError::conflict("Username or email already registered"));
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let user = User {
            id,
            username: data.username.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            created_at: Utc::now(),
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let Some(id) = self.emails.get(email).map(|id| *id) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }
}
