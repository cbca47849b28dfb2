//! Share link entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A time-bounded, optionally password-protected link to one file.
///
/// The link references the file but does not own it; it is not removed
/// when the file is deleted, it merely stops validating.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareLink {
    /// Unique share identifier.
    pub id: Uuid,
    /// The shared file.
    pub file_id: Uuid,
    /// Public, unguessable token used in URLs.
    pub share_token: String,
    /// When the link stops validating.
    pub expires_at: DateTime<Utc>,
    /// Password hash; `None` means the link is public.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// User who created the link.
    pub created_by: Uuid,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
}

impl ShareLink {
    /// A link is expired once `now` is strictly past its expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Check if the link requires a password.
    pub fn requires_password(&self) -> bool {
        self.password_hash.as_deref().is_some_and(|h| !h.is_empty())
    }
}

/// Data required to create a new share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareLink {
    /// The shared file.
    pub file_id: Uuid,
    /// Share token.
    pub share_token: String,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
    /// Password hash for protected links.
    pub password_hash: Option<String>,
    /// User creating the link.
    pub created_by: Uuid,
}
