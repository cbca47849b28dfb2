//! Record store traits consumed by the service layer.
//!
//! Every call is atomic per row. Nothing here spans the record store and the
//! blob store; cross-store consistency is the service layer's job.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use securestore_core::result::AppResult;
use securestore_entity::file::{CreateFile, File, FileStatus};
use securestore_entity::share::{CreateShareLink, ShareLink};
use securestore_entity::user::{CreateUser, User};

/// File metadata records.
#[async_trait]
pub trait FileStore: Send + Sync + Debug + 'static {
    /// Insert a `pending` record. Fails with `Conflict` if the owner already
    /// has a record at the same path.
    async fn create(&self, data: &CreateFile) -> AppResult<File>;

    /// Find a record by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>>;

    /// Find a record by owner and logical path.
    async fn find_by_owner_and_path(&self, user_id: Uuid, file_path: &str)
    -> AppResult<Option<File>>;

    /// List an owner's records, newest first.
    async fn list_by_owner(&self, user_id: Uuid) -> AppResult<Vec<File>>;

    /// List every record in `status`, oldest first.
    async fn list_by_status(&self, status: FileStatus) -> AppResult<Vec<File>>;

    /// Move a `pending` record to `uploaded`, stamping `uploaded_at`.
    ///
    /// Returns `None` if no *pending* record with this id exists.
    async fn mark_uploaded(&self, id: Uuid, uploaded_at: DateTime<Utc>) -> AppResult<Option<File>>;

    /// Delete a record. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Delete a record only while it is still `pending`.
    ///
    /// Lets sweeps purge abandoned uploads without racing a concurrent
    /// finalize.
    async fn delete_if_pending(&self, id: Uuid) -> AppResult<bool>;
}

/// Share link records.
#[async_trait]
pub trait ShareStore: Send + Sync + Debug + 'static {
    /// Insert a share link. Fails with `Conflict` on a duplicate token.
    async fn create(&self, data: &CreateShareLink) -> AppResult<ShareLink>;

    /// Find a link by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ShareLink>>;

    /// Find a link by its public token.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>>;

    /// List the links that reference a file, newest first.
    async fn list_by_file(&self, file_id: Uuid) -> AppResult<Vec<ShareLink>>;

    /// Delete a link. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Delete every link with `expires_at < now`. Returns the count removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// User accounts.
#[async_trait]
pub trait UserStore: Send + Sync + Debug + 'static {
    /// Insert a user. Fails with `Conflict` on a duplicate username or email.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Find a user by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
}
