//! Download payloads.

use bytes::Bytes;

/// What a caller receives when downloading a file.
///
/// Encrypted files are decrypted server-side and returned as bytes;
/// plaintext files are served by redirecting to a presigned read URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadContent {
    /// Decrypted file contents.
    Bytes(Bytes),
    /// Time-limited URL the caller should fetch directly.
    RedirectUrl(String),
}
