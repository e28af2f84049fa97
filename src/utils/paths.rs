//! Cross-Platform Path Utilities
//!
//! Functions for resolving the service's data directory (~/.cca-allocation/).

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the data directory (~/.cca-allocation/)
pub fn data_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".cca-allocation"))
}

/// Get the config file path (~/.cca-allocation/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(data_dir()?.join("config.json"))
}

/// Get the database file path (~/.cca-allocation/data.db)
pub fn database_path() -> AppResult<PathBuf> {
    Ok(data_dir()?.join("data.db"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Ensure the parent directory of a file path exists
pub fn ensure_parent_dir(path: &Path) -> AppResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}
