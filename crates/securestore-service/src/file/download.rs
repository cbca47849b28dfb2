//! Download flows: presigned redirect for plaintext, server-side decrypt for
//! encrypted files.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};
use uuid::Uuid;

use securestore_core::error::AppError;
use securestore_entity::file::{DownloadContent, File};

use super::service::FileService;
use crate::context::RequestContext;

impl FileService {
    /// Issues a time-limited read URL for a plaintext, uploaded file.
    pub async fn get_download_url(&self, file: &File) -> Result<String, AppError> {
        ensure_uploaded(file)?;
        if file.is_encrypted {
            return Err(AppError::validation(
                "Encrypted files are only served through the server",
            ));
        }

        let url = self
            .storage
            .presign_download(&file.storage_key, self.settings.presign_ttl)
            .await?;
        debug!(file_id = %file.id, "Download URL issued");
        Ok(url)
    }

    /// Fetches and decrypts an encrypted file.
    ///
    /// Any authentication failure is reported as a generic crypto error that
    /// does not say whether the blob was tampered with or the key is wrong.
    pub async fn download_decrypt(&self, file: &File) -> Result<Bytes, AppError> {
        ensure_uploaded(file)?;
        if !file.is_encrypted {
            return Err(AppError::validation("File is not encrypted"));
        }

        let blob = self.storage.read_bytes(&file.storage_key).await?;
        let key = Arc::clone(&self.key);
        let plaintext =
            tokio::task::spawn_blocking(move || securestore_crypto::open(&blob, key.as_bytes()))
                .await
                .map_err(|e| AppError::internal(format!("Decryption task failed: {e}")))?
                .map_err(|e| {
                    warn!(file_id = %file.id, "Stored blob failed authentication");
                    AppError::crypto(e)
                })?;

        Ok(Bytes::from(plaintext))
    }

    /// Returns the file's content in the form its encryption flag dictates.
    pub async fn get_download_content(&self, file: &File) -> Result<DownloadContent, AppError> {
        if file.is_encrypted {
            self.download_decrypt(file).await.map(DownloadContent::Bytes)
        } else {
            self.get_download_url(file)
                .await
                .map(DownloadContent::RedirectUrl)
        }
    }

    /// Downloads one of the caller's own files.
    pub async fn download(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> Result<(File, DownloadContent), AppError> {
        let file = self.get_file(ctx, file_id).await?;
        let content = self.get_download_content(&file).await?;
        Ok((file, content))
    }
}

fn ensure_uploaded(file: &File) -> Result<(), AppError> {
    if file.is_uploaded() {
        Ok(())
    } else {
        Err(AppError::conflict("File upload has not completed"))
    }
}
