//! Default data directory for attest
//!
//! User-writable by default (no root required):
//! `$XDG_DATA_HOME/attest` or `~/.local/share/attest`.

use std::path::PathBuf;

/// Environment variable for overriding the data directory
pub const ATTEST_DATA_DIR_ENV: &str = "ATTEST_DATA_DIR";

/// Application subdirectory name
const APP_DIR: &str = "attest";

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$ATTEST_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/attest` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/attest` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(ATTEST_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

/// Get the data directory without checking ATTEST_DATA_DIR env var.
/// Used for default values where the env var is checked separately.
pub fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("data")
}
