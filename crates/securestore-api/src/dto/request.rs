//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username.
    #[validate(length(min = 1, max = 100, message = "Username is required"))]
    pub username: String,
    /// Email address.
    #[validate(email(message = "Email address is invalid"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Presigned upload request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PresignedUploadRequest {
    /// Logical path, unique per user.
    #[validate(length(min = 1, message = "file_path is required"))]
    pub file_path: String,
    /// Declared size in bytes.
    #[validate(range(min = 0, message = "size_bytes must not be negative"))]
    pub size_bytes: i64,
}

/// Share link creation request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateShareRequest {
    /// File to share.
    pub file_id: Uuid,
    /// Link lifetime in hours.
    pub expiry_hours: i64,
    /// Optional password; empty or absent makes the link public.
    #[serde(default)]
    pub password: Option<String>,
}

/// Password submitted for a protected share link.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ShareValidateRequest {
    /// Share password.
    #[serde(default)]
    pub password: Option<String>,
}
