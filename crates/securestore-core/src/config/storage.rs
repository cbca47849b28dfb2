//! Blob store configuration.

use serde::{Deserialize, Serialize};

/// Which blob store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// S3-compatible object storage (AWS S3, MinIO).
    #[default]
    S3,
    /// Process-local in-memory store, for development and tests.
    Memory,
}

/// Blob store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend selection.
    #[serde(default)]
    pub provider: StorageBackend,
    /// Bucket holding every blob.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Endpoint URL for non-AWS services like MinIO. Empty means AWS.
    #[serde(default)]
    pub endpoint: String,
    /// Region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Static access key. Empty falls back to the default credential chain.
    #[serde(default)]
    pub access_key: String,
    /// Static secret key.
    #[serde(default)]
    pub secret_key: String,
    /// Use path-style addressing (required by MinIO).
    #[serde(default = "default_true")]
    pub force_path_style: bool,
    /// Lifetime of presigned upload and download URLs, in seconds.
    #[serde(default = "default_presign_ttl")]
    pub presign_ttl_seconds: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageBackend::default(),
            bucket: default_bucket(),
            endpoint: String::new(),
            region: default_region(),
            access_key: String::new(),
            secret_key: String::new(),
            force_path_style: true,
            presign_ttl_seconds: default_presign_ttl(),
        }
    }
}

fn default_bucket() -> String {
    "uploads".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_true() -> bool {
    true
}

fn default_presign_ttl() -> u64 {
    15 * 60
}
