//! Data directory layout for the chatbot.
//!
//! Only configuration lives on disk; transcripts are never persisted.

use std::path::{Path, PathBuf};

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "CHANGEBOT_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `CHANGEBOT_DATA_DIR` environment variable
/// 2. `~/.changebot` in the user's home directory
/// 3. `.changebot` relative to the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".changebot");
    }

    PathBuf::from(".changebot")
}

/// Path of the config file inside a data directory.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}
