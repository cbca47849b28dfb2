//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use securestore_entity::share::ShareLink;
use securestore_entity::user::User;
use securestore_service::PresignedUpload;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token.
    pub token: String,
    /// Token expiration.
    pub expires_at: DateTime<Utc>,
}

/// User summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Presigned upload response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresignedUploadResponse {
    /// ID of the new `pending` file, for the finalize call.
    pub file_id: Uuid,
    /// URL to `PUT` the bytes to.
    pub upload_url: String,
    /// When the URL stops working.
    pub expires_at: DateTime<Utc>,
}

impl From<PresignedUpload> for PresignedUploadResponse {
    fn from(upload: PresignedUpload) -> Self {
        Self {
            file_id: upload.file.id,
            upload_url: upload.upload_url,
            expires_at: upload.expires_at,
        }
    }
}

/// Share link details returned to its creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLinkResponse {
    /// Link ID, for deletion.
    pub id: Uuid,
    /// Shared file.
    pub file_id: Uuid,
    /// Public token.
    pub share_token: String,
    /// Expiry.
    pub expires_at: DateTime<Utc>,
    /// Whether a password is required.
    pub password_protected: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<ShareLink> for ShareLinkResponse {
    fn from(link: ShareLink) -> Self {
        Self {
            password_protected: link.requires_password(),
            id: link.id,
            file_id: link.file_id,
            share_token: link.share_token,
            expires_at: link.expires_at,
            created_at: link.created_at,
        }
    }
}

/// Download URL for a plaintext shared file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadUrlResponse {
    /// Time-limited read URL.
    pub download_url: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Blob store backend.
    pub storage: String,
    /// Whether the blob store answered.
    pub storage_reachable: bool,
}
