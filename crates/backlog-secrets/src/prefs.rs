//! Preferences store with transparent credential encryption.
//!
//! A single JSON file maps preference keys to string values, mirroring the
//! flat key/value store the application settings write through. Secret
//! entries (API tokens, keys) are stored as vault envelopes; reads of those
//! run through the vault's best-effort decrypt, so plaintext values
//! persisted before encryption was introduced keep working.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use backlog_core::SecretString;
use tracing::debug;

use crate::error::{Result, VaultError};
use crate::vault::CredentialVault;

/// Preference keys used by the application.
pub mod keys {
    pub const JIRA_DOMAIN: &str = "jira_domain";
    pub const JIRA_USER: &str = "jira_user";
    pub const JIRA_TOKEN: &str = "jira_token";
    pub const AI_ENDPOINT: &str = "ai_endpoint";
    pub const OPENAI_API_KEY: &str = "openai_api_key";
    pub const OPENAI_MODEL: &str = "openai_model";
    pub const SYSTEM_PROMPT: &str = "system_prompt";
}

/// Maximum allowed length for a preference key.
const MAX_KEY_LEN: usize = 128;

/// A file-backed preferences store.
///
/// The whole map is read and rewritten per operation; the file is created
/// with mode `0600` under a `0700` directory on Unix.
pub struct PreferencesStore {
    path: PathBuf,
    vault: Arc<CredentialVault>,
}

impl PreferencesStore {
    /// Store backed by an explicit file path.
    pub fn new(path: impl Into<PathBuf>, vault: Arc<CredentialVault>) -> Self {
        Self {
            path: path.into(),
            vault,
        }
    }

    /// Store backed by the default preferences file under the per-user
    /// config directory.
    pub fn at_default_path(vault: Arc<CredentialVault>) -> Result<Self> {
        Ok(Self::new(backlog_core::paths::preferences_file()?, vault))
    }

    /// Read a string preference. An absent key reads as the empty string.
    pub async fn string(&self, key: &str) -> Result<String> {
        validate_key(key)?;
        let map = self.read_map().await?;
        Ok(map.get(key).cloned().unwrap_or_default())
    }

    /// Write a string preference, replacing any previous value.
    pub async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let mut map = self.read_map().await?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map).await
    }

    /// Remove a preference. Removing an absent key is a no-op.
    pub async fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        let mut map = self.read_map().await?;
        if map.remove(key).is_some() {
            self.write_map(&map).await?;
        }
        Ok(())
    }

    /// Encrypt `plaintext` through the vault and store the envelope.
    pub async fn set_secret(&self, key: &str, plaintext: &str) -> Result<()> {
        let envelope = self.vault.encrypt(plaintext)?;
        debug!(key, "storing encrypted preference");
        self.set_string(key, &envelope).await
    }

    /// Read a secret preference.
    ///
    /// The stored value is run through the vault's best-effort decrypt, so
    /// both envelopes and legacy plaintext values come back as plaintext.
    /// An absent key reads as an empty secret.
    pub async fn secret(&self, key: &str) -> Result<SecretString> {
        let stored = self.string(key).await?;
        Ok(SecretString::new(self.vault.try_decrypt(&stored)))
    }

    async fn read_map(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_private_dir(parent).await?;
        }

        let json = serde_json::to_string_pretty(map)?;
        tokio::fs::write(&self.path, json.as_bytes()).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&self.path, perms).await?;
        }

        Ok(())
    }
}

/// Create `dir` if needed and restrict it to the owner on Unix.
async fn ensure_private_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o700);
        tokio::fs::set_permissions(dir, perms).await?;
    }

    Ok(())
}

/// Validate that a preference key contains only safe characters.
///
/// Allowed: ASCII alphanumeric, underscore, hyphen. Max length 128.
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(VaultError::InvalidKey("key must not be empty".to_string()));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(VaultError::InvalidKey(format!(
            "key exceeds maximum length of {MAX_KEY_LEN} characters"
        )));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(VaultError::InvalidKey(format!(
            "key contains invalid characters (allowed: alphanumeric, underscore, hyphen): {key}"
        )));
    }
    Ok(())
}
