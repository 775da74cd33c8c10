use std::env;
use std::path::PathBuf;

use dirs_next::{config_dir, home_dir};

/// Directory under the platform config dir that holds Exoscope files.
pub const APP_DIR_NAME: &str = "exoscope";
/// Environment variable overriding where the TUI writes its log file.
pub const LOG_PATH_ENV: &str = "EXOSCOPE_LOG_PATH";
const LOG_FILE_NAME: &str = "exoscope.log";

/// Expand a leading tilde (`~`) in a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

/// `<config dir>/exoscope`, or `./exoscope` when the platform has none.
pub fn config_root() -> PathBuf {
    config_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR_NAME)
}

/// Log file used while the TUI owns the terminal.
pub fn default_log_path() -> PathBuf {
    match env::var(LOG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => expand_tilde(&path),
        _ => config_root().join(LOG_FILE_NAME),
    }
}
