//! Path resolution utilities.

use crate::error::ConfigError;
use std::path::PathBuf;

/// Directory name under the platform config directory.
pub const APP_DIR_NAME: &str = "backlog-manager";

/// Get the Backlog Manager configuration directory.
///
/// Resolves to `{config_dir}/backlog-manager`, where `{config_dir}` is the
/// platform user configuration directory (`%APPDATA%` on Windows,
/// `~/Library/Application Support` on macOS, `$XDG_CONFIG_HOME` or
/// `~/.config` on Linux).
pub fn app_config_dir() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?;
    Ok(base.join(APP_DIR_NAME))
}

/// Get the encryption key file path (`{app_config_dir}/key.bin`).
pub fn key_file() -> Result<PathBuf, ConfigError> {
    Ok(app_config_dir()?.join("key.bin"))
}

/// Get the preferences file path (`{app_config_dir}/preferences.json`).
pub fn preferences_file() -> Result<PathBuf, ConfigError> {
    Ok(app_config_dir()?.join("preferences.json"))
}
