//! Configuration and filesystem helpers shared by the Exoscope CLI and TUI.

pub mod path_processing;
pub mod preferences;

pub use path_processing::{APP_DIR_NAME, LOG_PATH_ENV, config_root, default_log_path, expand_tilde};
pub use preferences::{PREFERENCES_PATH_ENV, PreferencesError, PreferencesPayload, UserPreferences};
