//! # securestore-auth
//!
//! Credential primitives for SecureStore.
//!
//! ## Modules
//!
//! - `password`: Argon2id password hashing and verification, used for both
//!   account passwords and share-link passwords
//! - `jwt`: signed session tokens binding a user id and an expiry

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
