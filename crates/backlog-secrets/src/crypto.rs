//! AES-256-GCM sealing with a SHA-256-derived cipher key.
//!
//! The stored master key is never used directly: the cipher key is the
//! SHA-256 digest of the raw key bytes. A fresh random nonce is generated
//! for every seal and prepended to the ciphertext, and the whole
//! `nonce || ciphertext+tag` buffer is base64-encoded into a single
//! envelope string suitable for storage as one preference value.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::{Result, VaultError};

/// AES-GCM nonce length in bytes.
pub const NONCE_SIZE: usize = 12;
/// Master key length in bytes.
pub const KEY_SIZE: usize = 32;

/// Build the cipher from the SHA-256 digest of the raw master key bytes.
fn cipher_for(master_key: &[u8]) -> Result<Aes256Gcm> {
    let derived: [u8; KEY_SIZE] = Sha256::digest(master_key).into();
    Aes256Gcm::new_from_slice(&derived).map_err(|e| VaultError::CipherInit(e.to_string()))
}

/// Seal `plaintext` into an envelope: `base64(nonce || ciphertext+tag)`.
///
/// A fresh nonce is drawn from the OS random source on every call, so the
/// same plaintext sealed twice produces different envelopes.
pub fn seal(master_key: &[u8], plaintext: &str) -> Result<String> {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| VaultError::RandomSource(e.to_string()))?;
    seal_with_nonce(master_key, &nonce, plaintext)
}

/// Seal with a caller-supplied nonce. Tests use this to pin the nonce and
/// assert exact envelopes; production sealing always goes through [`seal`].
pub(crate) fn seal_with_nonce(
    master_key: &[u8],
    nonce: &[u8; NONCE_SIZE],
    plaintext: &str,
) -> Result<String> {
    let cipher = cipher_for(master_key)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(nonce), plaintext.as_bytes())
        .map_err(|e| VaultError::CipherInit(e.to_string()))?;

    let mut buf = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    buf.extend_from_slice(nonce);
    buf.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(buf))
}

/// Open an envelope produced by [`seal`].
///
/// Fails with [`VaultError::InvalidEnvelopeEncoding`] on malformed base64,
/// [`VaultError::EnvelopeTooShort`] when the decoded bytes cannot contain a
/// nonce, and [`VaultError::AuthenticationFailed`] when tag verification
/// fails for any reason.
pub fn open(master_key: &[u8], envelope: &str) -> Result<String> {
    let data = BASE64.decode(envelope)?;
    if data.len() < NONCE_SIZE {
        return Err(VaultError::EnvelopeTooShort {
            len: data.len(),
            min: NONCE_SIZE,
        });
    }

    let (nonce, ciphertext) = data.split_at(NONCE_SIZE);
    let cipher = cipher_for(master_key)?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| VaultError::AuthenticationFailed)?;

    // Only UTF-8 ever goes in; anything else is foreign data.
    String::from_utf8(plaintext).map_err(|_| VaultError::AuthenticationFailed)
}
