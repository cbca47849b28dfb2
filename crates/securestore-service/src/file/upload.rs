//! Upload flows: presigned direct-to-store and server-side encrypted.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use securestore_core::error::AppError;
use securestore_database::FileStore;
use securestore_entity::file::{CreateFile, File};

use super::service::FileService;
use crate::context::RequestContext;

/// Result of starting a presigned upload.
#[derive(Debug, Clone, Serialize)]
pub struct PresignedUpload {
    /// Write-capable URL scoped to the file's storage key.
    pub upload_url: String,
    /// When the URL stops working.
    pub expires_at: DateTime<Utc>,
    /// The new `pending` record.
    pub file: File,
}

/// Deletes a `pending` record if dropped while armed.
///
/// Covers the window between record creation and finalize in the encrypted
/// upload: if the upload future is dropped there, the deletion is handed to
/// the runtime.
struct PendingRecordGuard {
    files: Arc<dyn FileStore>,
    file_id: Uuid,
    armed: bool,
}

impl PendingRecordGuard {
    fn new(files: Arc<dyn FileStore>, file_id: Uuid) -> Self {
        Self {
            files,
            file_id,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PendingRecordGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let files = Arc::clone(&self.files);
        let file_id = self.file_id;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!(file_id = %file_id, "Encrypted upload cancelled, removing pending record");
                handle.spawn(async move {
                    if let Err(e) = files.delete_if_pending(file_id).await {
                        error!(file_id = %file_id, error = %e, "Failed to remove cancelled upload record");
                    }
                });
            }
            Err(_) => {
                error!(
                    file_id = %file_id,
                    "Encrypted upload cancelled outside a runtime, pending record left for cleanup"
                );
            }
        }
    }
}

/// Checks a logical path before it becomes part of a storage key.
pub(crate) fn validate_file_path(file_path: &str) -> Result<(), AppError> {
    if file_path.trim().is_empty() {
        return Err(AppError::validation("File path must not be empty"));
    }
    if file_path.starts_with('/') {
        return Err(AppError::validation("File path must be relative"));
    }
    if file_path.split('/').any(|segment| segment == "..") {
        return Err(AppError::validation(
            "File path must not contain '..' segments",
        ));
    }
    if file_path.chars().any(char::is_control) {
        return Err(AppError::validation(
            "File path must not contain control characters",
        ));
    }
    Ok(())
}

impl FileService {
    /// Starts a presigned upload.
    ///
    /// The URL is issued before the record is created, so a presign failure
    /// leaves nothing behind. The client uploads out of band and then calls
    /// [`FileService::finalize_upload`]; the reconciler promotes or purges
    /// records whose client never does.
    #[tracing::instrument(skip(self, ctx), fields(user_id = %ctx.user_id))]
    pub async fn begin_presigned_upload(
        &self,
        ctx: &RequestContext,
        file_path: &str,
        size_bytes: i64,
    ) -> Result<PresignedUpload, AppError> {
        validate_file_path(file_path)?;
        if size_bytes < 0 {
            return Err(AppError::validation("File size must not be negative"));
        }

        let data = CreateFile {
            user_id: ctx.user_id,
            file_path: file_path.to_string(),
            size_bytes,
            is_encrypted: false,
        };

        let issued_at = Utc::now();
        let upload_url = self
            .storage
            .presign_upload(&data.storage_key(), self.settings.presign_ttl)
            .await?;
        let file = self.files.create(&data).await?;

        let expires_at = issued_at
            + chrono::Duration::from_std(self.settings.presign_ttl)
                .map_err(|_| AppError::configuration("Presign TTL out of range"))?;

        info!(
            file_id = %file.id,
            storage_key = %file.storage_key,
            size_bytes,
            "Presigned upload started"
        );

        Ok(PresignedUpload {
            upload_url,
            expires_at,
            file,
        })
    }

    /// Encrypts `data` under the server key and stores it.
    ///
    /// The record is created `pending`, the sealed blob (`nonce || ciphertext`)
    /// is written, then the record is finalized. Any failure after record
    /// creation deletes the record before the error is returned.
    #[tracing::instrument(skip(self, ctx, data), fields(user_id = %ctx.user_id, size_bytes = data.len()))]
    pub async fn upload_encrypted(
        &self,
        ctx: &RequestContext,
        file_path: &str,
        data: Bytes,
    ) -> Result<File, AppError> {
        validate_file_path(file_path)?;

        let size_bytes = i64::try_from(data.len())
            .map_err(|_| AppError::validation("File is too large"))?;
        let file = self
            .files
            .create(&CreateFile {
                user_id: ctx.user_id,
                file_path: file_path.to_string(),
                size_bytes,
                is_encrypted: true,
            })
            .await?;

        let mut guard = PendingRecordGuard::new(Arc::clone(&self.files), file.id);

        if let Err(e) = self.seal_and_write(&file, data).await {
            self.discard_pending(&file).await;
            guard.disarm();
            return Err(e);
        }

        let finalized = self.files.mark_uploaded(file.id, Utc::now()).await;
        guard.disarm();

        match finalized {
            Ok(Some(file)) => {
                info!(file_id = %file.id, storage_key = %file.storage_key, "Encrypted upload stored");
                Ok(file)
            }
            // A sweep can promote the record between the write and here.
            Ok(None) => match self.files.find_by_id(file.id).await? {
                Some(current) if current.is_uploaded() => {
                    info!(file_id = %current.id, "Encrypted upload already promoted by a sweep");
                    Ok(current)
                }
                _ => {
                    error!(
                        file_id = %file.id,
                        storage_key = %file.storage_key,
                        "File record vanished before finalize, blob left orphaned"
                    );
                    Err(AppError::not_found("File not found"))
                }
            },
            Err(e) => {
                self.discard_pending(&file).await;
                Err(e)
            }
        }
    }

    async fn seal_and_write(&self, file: &File, data: Bytes) -> Result<(), AppError> {
        let key = Arc::clone(&self.key);
        let sealed = tokio::task::spawn_blocking(move || securestore_crypto::seal(&data, key.as_bytes()))
            .await
            .map_err(|e| AppError::internal(format!("Encryption task failed: {e}")))?
            .map_err(|e| {
                AppError::with_source(securestore_core::ErrorKind::Crypto, "encryption failed", e)
            })?;

        self.storage
            .write(&file.storage_key, Bytes::from(sealed))
            .await
    }

    /// Compensating delete for a failed encrypted upload.
    async fn discard_pending(&self, file: &File) {
        match self.files.delete_if_pending(file.id).await {
            Ok(_) => warn!(file_id = %file.id, "Encrypted upload failed, pending record removed"),
            Err(e) => error!(
                file_id = %file.id,
                error = %e,
                "Encrypted upload failed and the pending record could not be removed"
            ),
        }
    }
}
