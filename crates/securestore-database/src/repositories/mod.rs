//! PostgreSQL implementations of the record store traits.

pub mod file;
pub mod share;
pub mod user;

pub use file::FileRepository;
pub use share::ShareRepository;
pub use user::UserRepository;

use securestore_core::error::{AppError, ErrorKind};

/// Map an insert failure, turning unique violations into `Conflict`.
pub(crate) fn insert_error(err: sqlx::Error, conflict: &str, failure: &str) -> AppError {
    let is_unique = err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if is_unique {
        AppError::with_source(ErrorKind::Conflict, conflict, err)
    } else {
        AppError::with_source(ErrorKind::Database, failure, err)
    }
}
