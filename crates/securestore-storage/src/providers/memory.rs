//! In-memory blob store.
//!
//! Presigned URLs use a `memory://` scheme and are not dereferenceable; they
//! only carry the key, operation and expiry so callers can be exercised end
//! to end. Failure switches let tests force individual operations to fail.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use dashmap::DashMap;

use securestore_core::error::AppError;
use securestore_core::result::AppResult;
use securestore_core::traits::storage::StorageProvider;

/// Operations that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    /// `write`
    Write,
    /// `read_bytes`
    Read,
    /// `delete`
    Delete,
    /// `exists`
    Exists,
    /// `presign_upload` and `presign_download`
    Presign,
}

#[derive(Debug, Default)]
struct FailureSwitches {
    write: AtomicBool,
    read: AtomicBool,
    delete: AtomicBool,
    exists: AtomicBool,
    presign: AtomicBool,
}

impl FailureSwitches {
    fn switch(&self, op: FailOn) -> &AtomicBool {
        match op {
            FailOn::Write => &self.write,
            FailOn::Read => &self.read,
            FailOn::Delete => &self.delete,
            FailOn::Exists => &self.exists,
            FailOn::Presign => &self.presign,
        }
    }

    fn check(&self, op: FailOn, key: &str) -> AppResult<()> {
        if self.switch(op).load(Ordering::SeqCst) {
            return Err(AppError::storage(format!(
                "injected {op:?} failure for key {key}"
            )));
        }
        Ok(())
    }
}

/// Blob store holding objects in process memory.
#[derive(Debug, Clone)]
pub struct MemoryStorageProvider {
    bucket: String,
    objects: Arc<DashMap<String, Bytes>>,
    failures: Arc<FailureSwitches>,
}

impl MemoryStorageProvider {
    /// Create an empty store for `bucket`.
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: Arc::new(DashMap::new()),
            failures: Arc::new(FailureSwitches::default()),
        }
    }

    /// Make every subsequent call of `op` fail (or succeed again).
    pub fn fail_on(&self, op: FailOn, fail: bool) {
        self.failures.switch(op).store(fail, Ordering::SeqCst);
    }

    /// Number of objects held.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Raw stored bytes, bypassing failure switches.
    pub fn get_raw(&self, key: &str) -> Option<Bytes> {
        self.objects.get(key).map(|b| b.clone())
    }

    /// Store bytes directly, standing in for a client using a presigned URL.
    pub fn put_raw(&self, key: &str, data: Bytes) {
        self.objects.insert(key.to_string(), data);
    }

    /// Remove an object directly, bypassing failure switches.
    pub fn delete_raw(&self, key: &str) -> Option<Bytes> {
        self.objects.remove(key).map(|(_, data)| data)
    }

    fn presign(&self, op: &str, key: &str, ttl: Duration) -> AppResult<String> {
        self.failures.check(FailOn::Presign, key)?;
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|_| AppError::storage("presign TTL out of range"))?;
        let expires = (Utc::now() + ttl).timestamp();
        Ok(format!(
            "memory://{}/{}?op={op}&expires={expires}",
            self.bucket, key
        ))
    }
}

#[async_trait]
impl StorageProvider for MemoryStorageProvider {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn presign_upload(&self, key: &str, ttl: Duration) -> AppResult<String> {
        self.presign("put", key, ttl)
    }

    async fn presign_download(&self, key: &str, ttl: Duration) -> AppResult<String> {
        self.presign("get", key, ttl)
    }

    async fn read_bytes(&self, key: &str) -> AppResult<Bytes> {
        self.failures.check(FailOn::Read, key)?;
        self.get_raw(key)
            .ok_or_else(|| AppError::storage(format!("Blob not found: {key}")))
    }

    async fn write(&self, key: &str, data: Bytes) -> AppResult<()> {
        self.failures.check(FailOn::Write, key)?;
        self.objects.insert(key.to_string(), data);
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.failures.check(FailOn::Delete, key)?;
        self.objects.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.failures.check(FailOn::Exists, key)?;
        Ok(self.objects.contains_key(key))
    }
}
