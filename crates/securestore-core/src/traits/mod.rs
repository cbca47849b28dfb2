//! Core traits defined in `securestore-core` and implemented by other crates.

pub mod storage;

pub use storage::StorageProvider;
