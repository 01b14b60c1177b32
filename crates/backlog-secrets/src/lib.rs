//! Encrypted credential storage for Backlog Manager.
//!
//! Jira API tokens and OpenAI keys are persisted as AES-256-GCM envelopes
//! in the preferences store. The encryption key lives in the platform
//! secret store with a local key-file fallback.

pub mod crypto;
pub mod error;
pub mod keysource;
pub mod prefs;
pub mod vault;

pub use error::{Result, VaultError};
pub use keysource::{FileKeySource, KeySource, KeyringSource, MasterKey};
pub use prefs::PreferencesStore;
pub use vault::CredentialVault;
