//! # securestore-storage
//!
//! Blob store implementations for SecureStore: an S3-compatible provider
//! (AWS S3, MinIO) and an in-memory provider for development and tests.

pub mod manager;
pub mod providers;

pub use manager::build_provider;
pub use providers::{FailOn, MemoryStorageProvider};
#[cfg(feature = "s3")]
pub use providers::S3StorageProvider;
