//! Path utilities for decanter.
//!
//! All data lives under `~/.decanter/`:
//! - `~/.decanter/config.toml` - main configuration
//! - `~/.decanter/session.json` - persisted session credentials

use std::path::PathBuf;

/// Returns the decanter home directory (`~/.decanter/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".decanter")
}

/// Returns the default config file path (`~/.decanter/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default session file path (`~/.decanter/session.json`).
pub fn session_file() -> PathBuf {
    home_dir().join("session.json")
}

/// Ensures the decanter home directory exists.
pub fn ensure_home_dir() -> std::io::Result<()> {
    std::fs::create_dir_all(home_dir())
}
