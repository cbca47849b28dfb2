//! In-memory share link store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use securestore_core::error::AppError;
use securestore_core::result::AppResult;
use securestore_entity::share::{CreateShareLink, ShareLink};

use crate::store::ShareStore;

/// Share store keeping links in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryShareStore {
    links: Arc<DashMap<Uuid, ShareLink>>,
    tokens: Arc<DashMap<String, Uuid>>,
}

impl MemoryShareStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of links held.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the store holds no links.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Insert a fully formed link, bypassing `create`. Test setups use this
    /// to plant already-expired links.
    pub fn insert(&self, link: ShareLink) {
        self.tokens.insert(link.share_token.clone(), link.id);
        self.links.insert(link.id, link);
    }
}

#[async_trait]
impl ShareStore for MemoryShareStore {
    async fn create(&self, data: &CreateShareLink) -> AppResult<ShareLink> {
        let id = Uuid::now_v7();
        match self.tokens.entry(data.share_token.clone()) {
            Entry::Occupied(_) => return Err(AppError::conflict("Share token collision")),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let link = ShareLink {
            id,
            file_id: data.file_id,
            share_token: data.share_token.clone(),
            expires_at: data.expires_at,
            password_hash: data.password_hash.clone(),
            created_by: data.created_by,
            created_at: Utc::now(),
        };
        self.links.insert(id, link.clone());
        Ok(link)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ShareLink>> {
        Ok(self.links.get(&id).map(|l| l.clone()))
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>> {
        let Some(id) = self.tokens.get(token).map(|id| *id) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn list_by_file(&self, file_id: Uuid) -> AppResult<Vec<ShareLink>> {
        let mut links: Vec<ShareLink> = self
            .links
            .iter()
            .filter(|l| l.file_id == file_id)
            .map(|l| l.clone())
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(links)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        match self.links.remove(&id) {
            Some((_, link)) => {
                self.tokens.remove(&link.share_token);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let expired: Vec<Uuid> = self
            .links
            .iter()
            .filter(|l| l.expires_at < now)
            .map(|l| l.id)
            .collect();

        let mut removed = 0;
        for id in expired {
            if let Some((_, link)) = self.links.remove_if(&id, |_, l| l.expires_at < now) {
                self.tokens.remove(&link.share_token);
                removed += 1;
            }
        }
        Ok(removed)
    }
}
