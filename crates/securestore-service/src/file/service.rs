//! File CRUD service: lookup, finalize, delete and listing.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use securestore_core::config::{StorageConfig, WorkerConfig};
use securestore_core::error::AppError;
use securestore_core::traits::storage::StorageProvider;
use securestore_crypto::FileKey;
use securestore_database::FileStore;
use securestore_entity::file::File;

use crate::context::RequestContext;

/// Tunables for [`FileService`].
#[derive(Debug, Clone)]
pub struct FileServiceSettings {
    /// Lifetime of presigned upload and download URLs.
    pub presign_ttl: Duration,
    /// Age past which a `pending` record with no blob is abandoned.
    pub stale_pending: Duration,
    /// Whether cleanup also drops `uploaded` records whose blob vanished.
    pub verify_uploaded_blobs: bool,
}

impl FileServiceSettings {
    /// Builds settings from the storage and worker configuration sections.
    pub fn from_config(storage: &StorageConfig, worker: &WorkerConfig) -> Self {
        Self {
            presign_ttl: Duration::from_secs(storage.presign_ttl_seconds),
            stale_pending: worker.stale_pending(),
            verify_uploaded_blobs: worker.verify_uploaded_blobs,
        }
    }
}

impl Default for FileServiceSettings {
    fn default() -> Self {
        Self {
            presign_ttl: Duration::from_secs(15 * 60),
            stale_pending: Duration::from_secs(60 * 60),
            verify_uploaded_blobs: false,
        }
    }
}

/// Manages file records and their blobs.
#[derive(Clone)]
pub struct FileService {
    /// File record store.
    pub(crate) files: Arc<dyn FileStore>,
    /// Blob store.
    pub(crate) storage: Arc<dyn StorageProvider>,
    /// Server-held encryption key, read-only after startup.
    pub(crate) key: Arc<FileKey>,
    /// Tunables.
    pub(crate) settings: FileServiceSettings,
}

impl std::fmt::Debug for FileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileService")
            .field("storage", &self.storage.provider_type())
            .field("settings", &self.settings)
            .finish()
    }
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        files: Arc<dyn FileStore>,
        storage: Arc<dyn StorageProvider>,
        key: Arc<FileKey>,
        settings: FileServiceSettings,
    ) -> Self {
        Self {
            files,
            storage,
            key,
            settings,
        }
    }

    /// Returns the blob store this service writes to.
    pub fn storage(&self) -> &Arc<dyn StorageProvider> {
        &self.storage
    }

    /// Finds a file by ID regardless of owner.
    ///
    /// Only for callers that established access some other way, such as a
    /// validated share link.
    pub async fn find_by_id(&self, file_id: Uuid) -> Result<File, AppError> {
        self.files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    /// Gets a file owned by the caller.
    ///
    /// Files of other users are reported as not found.
    pub async fn get_file(&self, ctx: &RequestContext, file_id: Uuid) -> Result<File, AppError> {
        let file = self.find_by_id(file_id).await?;
        if !file.is_owned_by(ctx.user_id) {
            return Err(AppError::not_found("File not found"));
        }
        Ok(file)
    }

    /// Lists the caller's files, newest first.
    pub async fn list_files(&self, ctx: &RequestContext) -> Result<Vec<File>, AppError> {
        self.files.list_by_owner(ctx.user_id).await
    }

    /// Transitions a `pending` file to `uploaded`.
    ///
    /// The caller is trusted to have placed the bytes; blob existence is not
    /// re-checked here. Finalizing an already uploaded file is a no-op.
    #[tracing::instrument(skip(self, ctx), fields(user_id = %ctx.user_id))]
    pub async fn finalize_upload(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> Result<File, AppError> {
        let file = self.get_file(ctx, file_id).await?;
        if file.is_uploaded() {
            return Ok(file);
        }

        match self.files.mark_uploaded(file.id, Utc::now()).await? {
            Some(file) => {
                info!(file_id = %file.id, "Upload finalized");
                Ok(file)
            }
            // Lost a race: either someone else finalized it or it was deleted.
            None => self.get_file(ctx, file_id).await,
        }
    }

    /// Deletes a file: blob first, then the record.
    ///
    /// If the blob cannot be removed the record is kept so the blob stays
    /// reachable, and the error is returned.
    #[tracing::instrument(skip(self, ctx), fields(user_id = %ctx.user_id))]
    pub async fn delete_file(&self, ctx: &RequestContext, file_id: Uuid) -> Result<(), AppError> {
        let file = self.get_file(ctx, file_id).await?;

        if let Err(e) = self.storage.delete(&file.storage_key).await {
            warn!(
                file_id = %file.id,
                storage_key = %file.storage_key,
                error = %e,
                "Blob deletion failed, keeping file record"
            );
            return Err(e);
        }

        self.files.delete(file.id).await?;

        info!(file_id = %file.id, "File deleted");
        Ok(())
    }
}
