//! Codec error type.

use thiserror::Error;

/// Errors produced by the codec.
///
/// Decryption never reports *why* authentication failed: a flipped bit, a
/// wrong nonce and a wrong key all surface as [`CryptoError::Authentication`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The key is not exactly 256 bits.
    #[error("key must be {expected} bytes, got {actual}")]
    KeyLength {
        /// Required length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },

    /// The integrity tag did not verify.
    #[error("authentication failed")]
    Authentication,

    /// The cipher refused to encrypt.
    #[error("encryption failed")]
    Encryption,

    /// A stored blob is too short to contain a nonce.
    #[error("sealed blob too short: {len} bytes")]
    Truncated {
        /// Length of the rejected input.
        len: usize,
    },

    /// Key material could not be decoded.
    #[error("key is not valid base64")]
    KeyEncoding,
}
