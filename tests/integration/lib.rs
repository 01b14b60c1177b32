//! Shared fixtures for integration tests.

use std::path::Path;
use std::sync::Arc;

use backlog_secrets::{CredentialVault, FileKeySource, KeySource, MasterKey, Result, VaultError};

/// Platform secret store stand-in that is always unavailable, matching a
/// headless test environment with no keychain service.
pub struct UnavailableKeySource;

impl KeySource for UnavailableKeySource {
    fn load(&self) -> Result<Option<MasterKey>> {
        Err(VaultError::PlatformStore(
            "secret store unavailable in tests".to_string(),
        ))
    }

    fn store(&self, _key: &MasterKey) -> Result<()> {
        Err(VaultError::PlatformStore(
            "secret store unavailable in tests".to_string(),
        ))
    }
}

/// A vault whose key lives only in `key_dir`, as on a machine without a
/// usable keychain. Building a second vault over the same directory models
/// a fresh process instance sharing the backing store.
pub fn file_only_vault(key_dir: &Path) -> Arc<CredentialVault> {
    Arc::new(CredentialVault::with_sources(
        Box::new(UnavailableKeySource),
        Box::new(FileKeySource::new(key_dir)),
    ))
}
