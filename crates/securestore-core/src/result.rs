//! Convenience result type alias for SecureStore.

use crate::error::AppError;

/// A specialized `Result` type for SecureStore operations.
pub type AppResult<T> = Result<T, AppError>;
