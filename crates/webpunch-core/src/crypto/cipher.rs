//! AES-256-GCM password tokens.
//!
//! `encrypt` generates a fresh random 12-byte nonce per call and prepends it
//! to the ciphertext; the whole blob is base64-encoded so it can live inside
//! the JSON config document. `decrypt` splits the nonce back out.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::{Error, Result};

const NONCE_LEN: usize = 12;

/// Encrypt a plaintext password into a stored token.
pub fn encrypt(key: &[u8; 32], plaintext: &str) -> Result<String> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| Error::Encryption(format!("invalid key length: {}", e)))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|e| Error::Encryption(format!("encryption error: {}", e)))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);

    Ok(BASE64.encode(blob))
}

/// Decrypt a token produced by [`encrypt`].
///
/// Any malformed input (bad base64, truncated blob, wrong key, tampered
/// ciphertext) is reported as [`Error::Decryption`].
pub fn decrypt(key: &[u8; 32], token: &str) -> Result<String> {
    let blob = BASE64.decode(token).map_err(|_| Error::Decryption)?;
    if blob.len() < NONCE_LEN {
        return Err(Error::Decryption);
    }

    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| Error::Decryption)?;
    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| Error::Decryption)?;

    String::from_utf8(plaintext).map_err(|_| Error::Decryption)
}
