//! Service wiring over in-memory stores for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use securestore_auth::PasswordHasher;
use securestore_core::error::AppError;
use securestore_core::result::AppResult;
use securestore_core::traits::storage::StorageProvider;
use securestore_crypto::FileKey;
use securestore_database::FileStore;
use securestore_database::memory::{MemoryFileStore, MemoryShareStore};
use securestore_entity::file::{CreateFile, File, FileStatus};
use securestore_storage::MemoryStorageProvider;

use crate::context::RequestContext;
use crate::file::{FileService, FileServiceSettings};
use crate::share::{AccessService, LinkService, ShareService};

pub(crate) struct Harness {
    pub files: Arc<FileService>,
    pub shares: ShareService,
    pub access: AccessService,
    pub blobs: MemoryStorageProvider,
    pub file_records: Arc<MemoryFileStore>,
    pub share_records: Arc<MemoryShareStore>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(FileServiceSettings::default())
    }

    pub fn with_verify_uploaded() -> Self {
        Self::with_settings(FileServiceSettings {
            verify_uploaded_blobs: true,
            ..FileServiceSettings::default()
        })
    }

    /// Blob writes promote every pending record whose blob is present, as a
    /// reconcile sweep landing mid-upload would.
    pub fn with_promoting_writes() -> Self {
        Self::build(FileServiceSettings::default(), |blobs, records| {
            let storage = Arc::new(PromotingStorage {
                inner: blobs,
                files: records.clone(),
            });
            (storage, records)
        })
    }

    /// Record store whose `mark_uploaded` fails while the returned switch is set.
    pub fn with_failing_finalize() -> (Self, Arc<AtomicBool>) {
        let switch = Arc::new(AtomicBool::new(true));
        let fail = Arc::clone(&switch);
        let harness = Self::build(FileServiceSettings::default(), move |blobs, records| {
            let store = Arc::new(FailingFinalizeStore {
                inner: records,
                fail,
            });
            (Arc::new(blobs), store)
        });
        (harness, switch)
    }

    fn with_settings(settings: FileServiceSettings) -> Self {
        Self::build(settings, |blobs, records| (Arc::new(blobs), records))
    }

    fn build<F>(settings: FileServiceSettings, wire: F) -> Self
    where
        F: FnOnce(
            MemoryStorageProvider,
            Arc<MemoryFileStore>,
        ) -> (Arc<dyn StorageProvider>, Arc<dyn FileStore>),
    {
        let blobs = MemoryStorageProvider::new("uploads");
        let file_records = Arc::new(MemoryFileStore::new());
        let share_records = Arc::new(MemoryShareStore::new());
        let hasher = Arc::new(PasswordHasher::new());
        let (storage, records) = wire(blobs.clone(), file_records.clone());

        let files = Arc::new(FileService::new(
            records,
            storage,
            Arc::new(FileKey::generate()),
            FileServiceSettings {
                presign_ttl: Duration::from_secs(900),
                ..settings
            },
        ));
        let shares = ShareService::new(
            share_records.clone(),
            files.clone(),
            LinkService::new(),
            hasher.clone(),
        );
        let access = AccessService::new(share_records.clone(), files.clone(), hasher);

        Self {
            files,
            shares,
            access,
            blobs,
            file_records,
            share_records,
        }
    }

    pub fn user(&self) -> RequestContext {
        RequestContext::new(Uuid::new_v4())
    }

    /// Inserts a `pending` plaintext record with a chosen creation time.
    pub fn backdated_pending(
        &self,
        ctx: &RequestContext,
        file_path: &str,
        created_at: DateTime<Utc>,
    ) -> File {
        let file = File {
            id: Uuid::new_v4(),
            user_id: ctx.user_id,
            file_path: file_path.to_string(),
            size_bytes: 1,
            is_encrypted: false,
            storage_key: File::storage_key_for(ctx.user_id, file_path),
            status: FileStatus::Pending,
            created_at,
            uploaded_at: None,
        };
        self.file_records.insert(file.clone());
        file
    }
}

#[derive(Debug)]
struct PromotingStorage {
    inner: MemoryStorageProvider,
    files: Arc<MemoryFileStore>,
}

#[async_trait]
impl StorageProvider for PromotingStorage {
    fn provider_type(&self) -> &str {
        self.inner.provider_type()
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    async fn presign_upload(&self, key: &str, ttl: Duration) -> AppResult<String> {
        self.inner.presign_upload(key, ttl).await
    }

    async fn presign_download(&self, key: &str, ttl: Duration) -> AppResult<String> {
        self.inner.presign_download(key, ttl).await
    }

    async fn read_bytes(&self, key: &str) -> AppResult<Bytes> {
        self.inner.read_bytes(key).await
    }

    async fn write(&self, key: &str, data: Bytes) -> AppResult<()> {
        self.inner.write(key, data).await?;
        for file in self.files.list_by_status(FileStatus::Pending).await? {
            if self.inner.exists(&file.storage_key).await? {
                self.files.mark_uploaded(file.id, Utc::now()).await?;
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }
}

#[derive(Debug)]
struct FailingFinalizeStore {
    inner: Arc<MemoryFileStore>,
    fail: Arc<AtomicBool>,
}

#[async_trait]
impl FileStore for FailingFinalizeStore {
    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        self.inner.create(data).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_owner_and_path(
        &self,
        user_id: Uuid,
        file_path: &str,
    ) -> AppResult<Option<File>> {
        self.inner.find_by_owner_and_path(user_id, file_path).await
    }

    async fn list_by_owner(&self, user_id: Uuid) -> AppResult<Vec<File>> {
        self.inner.list_by_owner(user_id).await
    }

    async fn list_by_status(&self, status: FileStatus) -> AppResult<Vec<File>> {
        self.inner.list_by_status(status).await
    }

    async fn mark_uploaded(&self, id: Uuid, uploaded_at: DateTime<Utc>) -> AppResult<Option<File>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::database("connection reset"));
        }
        self.inner.mark_uploaded(id, uploaded_at).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.inner.delete(id).await
    }

    async fn delete_if_pending(&self, id: Uuid) -> AppResult<bool> {
        self.inner.delete_if_pending(id).await
    }
}
