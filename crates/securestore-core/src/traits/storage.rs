//! Blob store trait for pluggable object storage backends.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for blob storage backends.
///
/// Blobs are opaque byte strings addressed by a storage key. Implementations
/// exist for S3-compatible object stores and an in-memory store; both live in
/// `securestore-storage`.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "s3", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Issue a URL that lets the holder write the blob at `key` until `ttl`
    /// elapses.
    async fn presign_upload(&self, key: &str, ttl: Duration) -> AppResult<String>;

    /// Issue a URL that lets the holder read the blob at `key` until `ttl`
    /// elapses.
    async fn presign_download(&self, key: &str, ttl: Duration) -> AppResult<String>;

    /// Read a blob into memory.
    async fn read_bytes(&self, key: &str) -> AppResult<Bytes>;

    /// Write a blob, replacing any existing one.
    async fn write(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Delete a blob. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a blob exists at `key`.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}
