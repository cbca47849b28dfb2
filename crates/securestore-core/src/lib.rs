//! # securestore-core
//!
//! Core crate for SecureStore. Contains the configuration schemas, the
//! blob-store trait and the unified error system.
//!
//! This crate has **no** internal dependencies on other SecureStore crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
