//! In-memory record stores.
//!
//! Backed by `DashMap`; uniqueness is enforced through secondary index maps
//! claimed with the entry API. Used by tests and single-process development
//! setups.

pub mod file;
pub mod share;
pub mod user;

pub use file::MemoryFileStore;
pub use share::MemoryShareStore;
pub use user::MemoryUserStore;
