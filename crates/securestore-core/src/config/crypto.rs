//! File encryption key configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use securestore_crypto::FileKey;

use crate::error::{AppError, ErrorKind};

/// Server-held key material for inline encrypted uploads.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct CryptoConfig {
    /// Base64 (standard alphabet) encoding of a 256-bit key.
    #[serde(default)]
    pub file_key: String,
}

impl CryptoConfig {
    /// Decode the configured key. The decoded bytes only ever live inside
    /// the returned [`FileKey`], which wipes them on drop.
    pub fn file_key(&self) -> Result<FileKey, AppError> {
        FileKey::from_base64(&self.file_key).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("crypto.file_key is unusable: {e}"),
                e,
            )
        })
    }
}

impl fmt::Debug for CryptoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoConfig")
            .field("file_key", &"[REDACTED]")
            .finish()
    }
}
