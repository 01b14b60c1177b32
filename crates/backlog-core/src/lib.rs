//! # backlog-core
//!
//! Shared functionality for Backlog Manager crates:
//!
//! - **Paths**: resolution of the per-user configuration directory
//! - **Secrets**: zero-on-drop string handling for decrypted credentials

pub mod error;
pub mod paths;
pub mod secret;

pub use error::ConfigError;
pub use secret::SecretString;
