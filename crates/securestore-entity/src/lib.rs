//! # securestore-entity
//!
//! Domain entity models for SecureStore. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities derive `sqlx::FromRow`.

pub mod file;
pub mod share;
pub mod user;
