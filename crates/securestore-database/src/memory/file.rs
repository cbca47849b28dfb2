//! In-memory file store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use securestore_core::error::AppError;
use securestore_core::result::AppResult;
use securestore_entity::file::{CreateFile, File, FileStatus};

use crate::store::FileStore;

/// File store keeping records in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileStore {
    files: Arc<DashMap<Uuid, File>>,
    /// storage key -> file id; the storage key encodes `(user_id, file_path)`.
    keys: Arc<DashMap<String, Uuid>>,
}

impl MemoryFileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Insert a fully formed record, bypassing `create`. Test setups use this
    /// to backdate `created_at`.
    pub fn insert(&self, file: File) {
        self.keys.insert(file.storage_key.clone(), file.id);
        self.files.insert(file.id, file);
    }

    fn remove(&self, id: Uuid) -> Option<File> {
        let (_, file) = self.files.remove(&id)?;
        self.keys.remove_if(&file.storage_key, |_, owner| *owner == id);
        Some(file)
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        let storage_key = data.storage_key();
        let id = Uuid::now_v7();
        match self.keys.entry(storage_key.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::conflict("A file already exists at this path"));
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let file = File {
            id,
            user_id: data.user_id,
            file_path: data.file_path.clone(),
            size_bytes: data.size_bytes,
            is_encrypted: data.is_encrypted,
            storage_key,
            status: FileStatus::Pending,
            created_at: Utc::now(),
            uploaded_at: None,
        };
        self.files.insert(id, file.clone());
        Ok(file)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        Ok(self.files.get(&id).map(|f| f.clone()))
    }

    async fn find_by_owner_and_path(
        &self,
        user_id: Uuid,
        file_path: &str,
    ) -> AppResult<Option<File>> {
        let key = File::storage_key_for(user_id, file_path);
        let Some(id) = self.keys.get(&key).map(|id| *id) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn list_by_owner(&self, user_id: Uuid) -> AppResult<Vec<File>> {
        let mut files: Vec<File> = self
            .files
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.clone())
            .collect();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    async fn list_by_status(&self, status: FileStatus) -> AppResult<Vec<File>> {
        let mut files: Vec<File> = self
            .files
            .iter()
            .filter(|f| f.status == status)
            .map(|f| f.clone())
            .collect();
        files.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(files)
    }

    async fn mark_uploaded(&self, id: Uuid, uploaded_at: DateTime<Utc>) -> AppResult<Option<File>> {
        let Some(mut file) = self.files.get_mut(&id) else {
            return Ok(None);
        };
        if !file.status.can_transition_to(FileStatus::Uploaded) {
            return Ok(None);
        }
        file.status = FileStatus::Uploaded;
        file.uploaded_at = Some(uploaded_at);
        Ok(Some(file.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.remove(id).is_some())
    }

    async fn delete_if_pending(&self, id: Uuid) -> AppResult<bool> {
        let removed = self
            .files
            .remove_if(&id, |_, f| f.status == FileStatus::Pending);
        match removed {
            Some((_, file)) => {
                self.keys.remove_if(&file.storage_key, |_, owner| *owner == id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
