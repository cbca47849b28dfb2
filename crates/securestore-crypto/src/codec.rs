//! AES-256-GCM encryption and the `nonce || ciphertext` framing.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::error::CryptoError;
use crate::{KEY_SIZE, NONCE_SIZE};

/// Encrypt `plaintext` under a 256-bit `key`.
///
/// Returns the ciphertext (with the 16-byte tag appended) and the fresh
/// random nonce it was sealed with. The nonce must never be reused.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_SIZE]), CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::KeyLength {
        expected: KEY_SIZE,
        actual: key.len(),
    })?;

    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::Encryption)?;
    Ok((ciphertext, nonce))
}

/// Decrypt `ciphertext` sealed with `nonce` under `key`.
///
/// A wrong key length, a nonce of the wrong size, a wrong key and any bit
/// flip all fail with [`CryptoError::Authentication`].
pub fn decrypt(ciphertext: &[u8], nonce: &[u8], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if nonce.len() != NONCE_SIZE {
        return Err(CryptoError::Authentication);
    }
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::Authentication)?;
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::Authentication)
}

/// Encrypt and frame as `nonce || ciphertext+tag`, the stored blob format.
pub fn seal(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let (ciphertext, nonce) = encrypt(plaintext, key)?;
    let mut blob = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Split a stored blob into nonce and ciphertext and decrypt it.
pub fn open(blob: &[u8], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if blob.len() < NONCE_SIZE {
        return Err(CryptoError::Truncated { len: blob.len() });
    }
    let (nonce, ciphertext) = blob.split_at(NONCE_SIZE);
    decrypt(ciphertext, nonce, key)
}
