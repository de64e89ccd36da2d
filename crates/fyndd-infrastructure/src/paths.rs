//! Unified path management for fyndd client files.
//!
//! ```text
//! ~/.config/fyndd/
//! ├── config.toml     # Client configuration
//! └── state.json      # Client-local state (token, pending friend requests, ...)
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "fyndd";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Neither a platform config directory nor a home directory exists.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for fyndd_core::FynddError {
    fn from(e: PathError) -> Self {
        fyndd_core::FynddError::config(e.to_string())
    }
}

/// Resolves the locations of fyndd files.
pub struct FynddPaths;

impl FynddPaths {
    /// Returns the fyndd configuration directory (e.g. `~/.config/fyndd/`).
    ///
    /// Falls back to `~/.config/fyndd` when the platform reports no config
    /// directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default path of the client state file.
    pub fn state_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("state.json"))
    }
}
