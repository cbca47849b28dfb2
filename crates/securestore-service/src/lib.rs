//! # securestore-service
//!
//! Business logic service layer for SecureStore. Each service orchestrates
//! record stores, the blob store and the crypto codec to implement
//! application-level use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references, typed against the store
//! traits so that PostgreSQL and in-memory backends are interchangeable.

pub mod context;
pub mod file;
pub mod share;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use context::RequestContext;
pub use file::{FileService, FileServiceSettings, PresignedUpload, SweepReport};
pub use share::{AccessService, LinkService, ShareService};
pub use user::UserService;
