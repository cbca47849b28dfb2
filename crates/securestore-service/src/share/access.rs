//! Share access: validates share tokens and serves the shared file to
//! unauthenticated callers.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use securestore_auth::password::PasswordHasher;
use securestore_core::error::AppError;
use securestore_database::ShareStore;
use securestore_entity::file::{DownloadContent, File};

use crate::file::FileService;

/// Handles public share access validation.
#[derive(Debug, Clone)]
pub struct AccessService {
    /// Share link store.
    shares: Arc<dyn ShareStore>,
    /// File service, for resolving and reading the shared file.
    files: Arc<FileService>,
    /// Password hasher for verification.
    hasher: Arc<PasswordHasher>,
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(
        shares: Arc<dyn ShareStore>,
        files: Arc<FileService>,
        hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            shares,
            files,
            hasher,
        }
    }

    /// Validates a share token and returns the shared file.
    ///
    /// Checks run in a fixed order: token, expiry, password presence,
    /// password match, file existence. An expired link therefore fails as
    /// expired whatever password is supplied.
    pub async fn validate_share_link(
        &self,
        token: &str,
        password: Option<&str>,
    ) -> Result<File, AppError> {
        let link = self
            .shares
            .find_by_token(token)
            .await?
            .ok_or_else(AppError::invalid_link)?;

        if link.is_expired_at(Utc::now()) {
            debug!(share_id = %link.id, "Share link expired");
            return Err(AppError::expired());
        }

        if let Some(hash) = link.password_hash.as_deref().filter(|h| !h.is_empty()) {
            let password = password
                .filter(|p| !p.is_empty())
                .ok_or_else(AppError::password_required)?;
            if !self.hasher.verify_password(password, hash)? {
                debug!(share_id = %link.id, "Share link password rejected");
                return Err(AppError::invalid_password());
            }
        }

        self.files.find_by_id(link.file_id).await
    }

    /// Returns the shared file's content.
    ///
    /// This is the only path from an unauthenticated share access to file
    /// bytes; it adds nothing beyond what validation established.
    pub async fn get_download_content(&self, file: &File) -> Result<DownloadContent, AppError> {
        self.files.get_download_content(file).await
    }

    /// Validates a link without a password and returns its content.
    pub async fn access_share_link(
        &self,
        token: &str,
    ) -> Result<(File, DownloadContent), AppError> {
        self.validate_and_download(token, None).await
    }

    /// Validates a link with an optional password and returns its content.
    pub async fn validate_and_download(
        &self,
        token: &str,
        password: Option<&str>,
    ) -> Result<(File, DownloadContent), AppError> {
        let file = self.validate_share_link(token, password).await?;
        let content = self.get_download_content(&file).await?;
        info!(file_id = %file.id, "Shared file accessed");
        Ok((file, content))
    }
}
