//! # securestore-crypto
//!
//! Symmetric authenticated encryption of file bytes under a server-held key.
//!
//! Cipher: AES-256-GCM with a random 96-bit nonce per call.
//!
//! Stored blob format:
//! ```text
//! [12 bytes: random nonce][N bytes: ciphertext][16 bytes: GCM tag]
//! ```
//!
//! The nonce length is fixed by the cipher and is not configurable. Nonces
//! are drawn from the OS RNG on every call, never derived from a counter.
//!
//! Pure and synchronous; no I/O.

pub mod codec;
pub mod error;
pub mod key;

pub use codec::{decrypt, encrypt, open, seal};
pub use error::CryptoError;
pub use key::FileKey;

/// Size of an AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of an AES-GCM nonce (96-bit).
pub const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag.
pub const TAG_SIZE: usize = 16;
