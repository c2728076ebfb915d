//! Path management for bankrec
//!
//! ## Path Resolution Order
//!
//! 1. `BANKREC_DATA_DIR` environment variable (if set)
//! 2. The platform config directory joined with `bankrec`
//!    (`~/.config/bankrec` on Linux, `%APPDATA%\bankrec` on Windows)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::MatchError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "BANKREC_DATA_DIR";

/// Manages all paths used by bankrec
#[derive(Debug, Clone)]
pub struct BankrecPaths {
    base_dir: PathBuf,
}

impl BankrecPaths {
    /// Resolve the base directory from the environment or the platform
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, MatchError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the session audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("session.log")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), MatchError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| MatchError::Io(format!("Failed to create base directory: {}", e)))
    }

    /// Check if bankrec has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, MatchError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| MatchError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join("bankrec"))
}
