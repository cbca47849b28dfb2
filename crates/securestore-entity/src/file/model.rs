//! File entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::FileStatus;

/// A user-owned file tracked by SecureStore.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// The owning user.
    pub user_id: Uuid,
    /// Logical path, unique per user.
    pub file_path: String,
    /// Declared size in bytes.
    pub size_bytes: i64,
    /// Whether the blob is encrypted under the server key.
    pub is_encrypted: bool,
    /// Blob store key, `{user_id}/{file_path}`.
    pub storage_key: String,
    /// Lifecycle status.
    pub status: FileStatus,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the upload was confirmed.
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl File {
    /// Derive the storage key for a user's logical path.
    pub fn storage_key_for(user_id: Uuid, file_path: &str) -> String {
        format!("{user_id}/{file_path}")
    }

    /// Check if the bytes have been confirmed present.
    pub fn is_uploaded(&self) -> bool {
        self.status == FileStatus::Uploaded
    }

    /// Check if the file belongs to `user_id`.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Check if a pending record has outlived the staleness threshold.
    pub fn is_stale(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        self.status == FileStatus::Pending && now - self.created_at > threshold
    }
}

/// Data required to create a new file record.
///
/// Records are always created `pending`; the store assigns the id and
/// creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The owning user.
    pub user_id: Uuid,
    /// Logical path.
    pub file_path: String,
    /// Declared size in bytes.
    pub size_bytes: i64,
    /// Whether the blob will be encrypted.
    pub is_encrypted: bool,
}

impl CreateFile {
    /// The storage key this record will use.
    pub fn storage_key(&self) -> String {
        File::storage_key_for(self.user_id, &self.file_path)
    }
}
