//! Storage provider implementations.

pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

pub use memory::{FailOn, MemoryStorageProvider};
#[cfg(feature = "s3")]
pub use s3::S3StorageProvider;
