//! Location of the CLI's preference stores.
//!
//! Stores live in a single folder, one JSON file per store name:
//!
//! - `$PREFS_STORE_DIR` when set (see [`STORE_DIR_ENV`](crate::command::STORE_DIR_ENV))
//! - `~/.config/preference-store` (Unix)
//! - `%APPDATA%\preference-store` (Windows)

use std::path::PathBuf;

use preference_store::StoreConfiguration;
use thiserror::Error;

/// Errors that can occur while locating the stores.
#[derive(Debug, Error)]
pub enum StateError {
    /// Config directory not found (HOME or APPDATA not set).
    #[error("Config directory not found (HOME or APPDATA environment variable not set)")]
    ConfigDirNotFound,
}

/// Get the store configuration for the CLI
pub(crate) fn get_store_config(
    memory: bool,
    store_dir: Option<PathBuf>,
) -> Result<StoreConfiguration, StateError> {
    if memory {
        return Ok(StoreConfiguration::Memory);
    }

    let folder_path = match store_dir {
        Some(dir) => dir,
        None => get_config_dir()?,
    };
    Ok(StoreConfiguration::File { folder_path })
}

/// Get the CLI config directory
fn get_config_dir() -> Result<PathBuf, StateError> {
    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var("APPDATA").map_err(|_| StateError::ConfigDirNotFound)?;
        Ok(PathBuf::from(appdata).join("preference-store"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").map_err(|_| StateError::ConfigDirNotFound)?;
        Ok(PathBuf::from(home).join(".config").join("preference-store"))
    }
}
