//! File key generation.

use securestore_crypto::FileKey;

/// Print a fresh base64 key suitable for `crypto.file_key`.
pub fn execute() {
    println!("{}", FileKey::generate().to_base64());
}
