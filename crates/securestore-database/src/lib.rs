//! # securestore-database
//!
//! Record stores for SecureStore. The [`store`] traits are what the service
//! layer depends on; [`repositories`] implements them over PostgreSQL and
//! [`memory`] over process-local maps.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{FileStore, ShareStore, UserStore};
