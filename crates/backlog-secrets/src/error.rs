//! Error types for credential storage.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the credential vault and preferences store.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The platform could not supply a per-user configuration directory.
    #[error("Platform user configuration directory is unavailable")]
    ConfigDirUnavailable,

    /// The key directory could not be created.
    #[error("Could not create key directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The OS random source failed. Never downgraded to a weaker source.
    #[error("System random source failed: {0}")]
    RandomSource(String),

    /// A newly generated key could not be written to durable storage.
    #[error("Could not persist key file {path}: {source}")]
    KeyPersist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The local key file exists but could not be read.
    #[error("Could not read key file {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Platform secret store failure. Key resolution logs this and falls
    /// back to the local key file; it never reaches encrypt/decrypt callers.
    #[error("Platform secret store error: {0}")]
    PlatformStore(String),

    /// AEAD cipher construction failed.
    #[error("Cipher initialization failed: {0}")]
    CipherInit(String),

    /// The envelope is not valid base64.
    #[error("Envelope is not valid base64: {0}")]
    InvalidEnvelopeEncoding(#[from] base64::DecodeError),

    /// The decoded envelope is shorter than the nonce.
    #[error("Envelope too short: {len} bytes, need at least {min}")]
    EnvelopeTooShort { len: usize, min: usize },

    /// Tag verification failed. Carries no detail on purpose: wrong key,
    /// corruption, and foreign data are indistinguishable to the caller.
    #[error("Envelope authentication failed")]
    AuthenticationFailed,

    /// Key resolution failed during encrypt or decrypt.
    #[error("Encryption key unavailable: {0}")]
    KeyUnavailable(#[source] Box<VaultError>),

    /// Invalid preference key name.
    #[error("Invalid preference key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<backlog_core::ConfigError> for VaultError {
    fn from(err: backlog_core::ConfigError) -> Self {
        match err {
            backlog_core::ConfigError::ConfigDirUnavailable => VaultError::ConfigDirUnavailable,
            backlog_core::ConfigError::Io(e) => VaultError::Io(e),
        }
    }
}

/// Convenience result alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
