//! Master key storage backends.
//!
//! The 256-bit master key is held redundantly in the platform secret store
//! (system keychain) and in a `key.bin` file under the per-user config
//! directory. Each backend implements [`KeySource`]; the vault composes
//! them, preferring the keychain and falling back to the file.

use std::fmt;
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::KEY_SIZE;
use crate::error::{Result, VaultError};

/// Service name for the platform secret store entry.
pub const KEYRING_SERVICE: &str = "backlog-manager";
/// Account name for the platform secret store entry.
pub const KEYRING_ACCOUNT: &str = "encryption-key";

/// The symmetric master key for this installation.
///
/// Zeroed on drop. The raw bytes are hashed before use as a cipher key, so
/// this value and the cipher key are never bit-identical.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    bytes: Vec<u8>,
}

impl MasterKey {
    /// Expected key length in bytes.
    pub const LEN: usize = KEY_SIZE;

    /// Wrap existing key material.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Generate a fresh key from the OS random source.
    ///
    /// Fails with [`VaultError::RandomSource`] if the source is unavailable;
    /// a weaker source is never substituted.
    pub fn generate() -> Result<Self> {
        let mut bytes = vec![0u8; Self::LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| VaultError::RandomSource(e.to_string()))?;
        Ok(Self { bytes })
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

// Never print key material
impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey([REDACTED])")
    }
}

/// A backend the master key can be loaded from and stored to.
pub trait KeySource: Send + Sync {
    /// Load the key. `Ok(None)` means the backend holds no key.
    fn load(&self) -> Result<Option<MasterKey>>;

    /// Persist the key.
    fn store(&self, key: &MasterKey) -> Result<()>;
}

/// Platform secret store backend, addressed by a fixed `(service, account)`
/// pair. The key is stored base64-encoded.
pub struct KeyringSource {
    service: String,
    account: String,
}

impl KeyringSource {
    /// Source using the Backlog Manager service/account pair.
    pub fn new() -> Self {
        Self::with_names(KEYRING_SERVICE, KEYRING_ACCOUNT)
    }

    /// Source addressed by a custom service/account pair.
    pub fn with_names(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service, &self.account)
            .map_err(|e| VaultError::PlatformStore(e.to_string()))
    }
}

impl Default for KeyringSource {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for KeyringSource {
    fn load(&self) -> Result<Option<MasterKey>> {
        match self.entry()?.get_password() {
            Ok(encoded) => {
                let decoded = BASE64.decode(encoded.trim()).map_err(|e| {
                    VaultError::PlatformStore(format!("stored key is not valid base64: {e}"))
                })?;
                if decoded.len() != MasterKey::LEN {
                    return Err(VaultError::PlatformStore(format!(
                        "stored key has wrong length: {} (expected {})",
                        decoded.len(),
                        MasterKey::LEN
                    )));
                }
                Ok(Some(MasterKey::from_bytes(decoded)))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(VaultError::PlatformStore(e.to_string())),
        }
    }

    fn store(&self, key: &MasterKey) -> Result<()> {
        self.entry()?
            .set_password(&BASE64.encode(key.as_bytes()))
            .map_err(|e| VaultError::PlatformStore(e.to_string()))
    }
}

/// Local key-file backend: `key.bin` inside a directory, file mode `0600`,
/// directory mode `0700`.
pub struct FileKeySource {
    dir: PathBuf,
}

impl FileKeySource {
    /// Source rooted at an explicit directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Source rooted at the default per-user config directory.
    pub fn at_default_dir() -> Result<Self> {
        Ok(Self::new(backlog_core::paths::app_config_dir()?))
    }

    fn key_path(&self) -> PathBuf {
        self.dir.join("key.bin")
    }
}

impl KeySource for FileKeySource {
    fn load(&self) -> Result<Option<MasterKey>> {
        let path = self.key_path();
        match std::fs::read(&path) {
            // Raw file contents are the key; no length check on read.
            Ok(bytes) => Ok(Some(MasterKey::from_bytes(bytes))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VaultError::KeyRead { path, source: e }),
        }
    }

    fn store(&self, key: &MasterKey) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| VaultError::DirectoryCreate {
            path: self.dir.clone(),
            source: e,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            std::fs::set_permissions(&self.dir, perms).map_err(|e| {
                VaultError::DirectoryCreate {
                    path: self.dir.clone(),
                    source: e,
                }
            })?;
        }

        let path = self.key_path();
        std::fs::write(&path, key.as_bytes()).map_err(|e| VaultError::KeyPersist {
            path: path.clone(),
            source: e,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&path, perms)
                .map_err(|e| VaultError::KeyPersist { path, source: e })?;
        }

        Ok(())
    }
}
