//! Authenticated encryption of credentials at rest.
//!
//! [`CredentialVault`] resolves a persistent 256-bit master key and exposes
//! encrypt/decrypt of short secret strings (API tokens, keys) for storage
//! in the preferences store. Key resolution prefers the platform secret
//! store and falls back to a local key file; a newly generated key is
//! written to both backends so either can serve future reads.

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::crypto;
use crate::error::{Result, VaultError};
use crate::keysource::{FileKeySource, KeySource, KeyringSource, MasterKey};

/// Encrypts and decrypts credential strings with a durable per-install key.
///
/// The key is re-resolved on every call rather than cached, so an external
/// change to either backing store takes effect on the next operation.
pub struct CredentialVault {
    platform: Box<dyn KeySource>,
    local: Box<dyn KeySource>,
    // Serializes first-run key creation so concurrent callers cannot
    // generate and persist two different keys.
    init_lock: Mutex<()>,
}

impl CredentialVault {
    /// Vault over the system keychain and the default key-file directory.
    ///
    /// Fails with [`VaultError::ConfigDirUnavailable`] when the platform
    /// has no per-user configuration directory.
    pub fn new() -> Result<Self> {
        Ok(Self::with_sources(
            Box::new(KeyringSource::new()),
            Box::new(FileKeySource::at_default_dir()?),
        ))
    }

    /// Vault over explicit key backends.
    ///
    /// Test harnesses use this to run with the platform secret store
    /// disabled or with key files under a temporary directory.
    pub fn with_sources(platform: Box<dyn KeySource>, local: Box<dyn KeySource>) -> Self {
        Self {
            platform,
            local,
            init_lock: Mutex::new(()),
        }
    }

    /// Resolve the master key, generating and persisting one on first use.
    ///
    /// The platform secret store is authoritative when it holds a key of
    /// the correct length. Any failure there falls back to the local key
    /// file; the fallback is logged, never surfaced to the caller.
    fn resolve_key(&self) -> Result<MasterKey> {
        match self.platform.load() {
            Ok(Some(key)) => return Ok(key),
            Ok(None) => debug!("platform secret store holds no key, using local key file"),
            Err(e) => warn!("platform secret store unavailable, falling back to local key file: {e}"),
        }

        let _guard = self.init_lock.lock();

        if let Some(key) = self.local.load()? {
            return Ok(key);
        }

        debug!("no key in either backend, generating a new master key");
        let key = MasterKey::generate()?;

        // Best effort; a keychain write failure leaves the file authoritative.
        if let Err(e) = self.platform.store(&key) {
            warn!("could not store new key in platform secret store: {e}");
        }

        // The local write is fatal: an unpersisted key would be unreadable
        // on the next run.
        self.local.store(&key)?;
        Ok(key)
    }

    /// Encrypt `plaintext`, returning a base64 envelope of
    /// `nonce || ciphertext+tag` under AES-256-GCM.
    ///
    /// Key resolution failures are reported as [`VaultError::KeyUnavailable`].
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let key = self
            .resolve_key()
            .map_err(|e| VaultError::KeyUnavailable(Box::new(e)))?;
        crypto::seal(key.as_bytes(), plaintext)
    }

    /// Decrypt an envelope produced by [`encrypt`](Self::encrypt).
    ///
    /// Uses the same key resolution as encrypt, so a value written by one
    /// process instance is readable by a later one over the same stores.
    pub fn decrypt(&self, envelope: &str) -> Result<String> {
        let key = self
            .resolve_key()
            .map_err(|e| VaultError::KeyUnavailable(Box::new(e)))?;
        crypto::open(key.as_bytes(), envelope)
    }

    /// Best-effort decrypt for values that may predate encryption.
    ///
    /// Returns the input unchanged on any failure, and an empty input
    /// unchanged without touching the key at all. This keeps a preferences
    /// store with mixed plaintext/encrypted history readable; the absence
    /// of an error is not proof the value was actually encrypted.
    pub fn try_decrypt(&self, value: &str) -> String {
        if value.is_empty() {
            return String::new();
        }
        match self.decrypt(value) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                trace!("value passed through undecrypted: {e}");
                value.to_string()
            }
        }
    }
}
