//! Error types for Backlog Manager core.

use thiserror::Error;

/// Configuration and path resolution errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform could not supply a per-user configuration directory.
    #[error("Platform user configuration directory is unavailable")]
    ConfigDirUnavailable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
