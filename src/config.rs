use std::ffi::OsString;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Sagefemme";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Overrides the data directory (tests, portable installs).
pub const DATA_DIR_ENV: &str = "SAGEFEMME_DATA_DIR";

const DATABASE_FILE: &str = "practice.db";

/// Tracing filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "sagefemme=info"
}

/// Get the application data directory
/// `$SAGEFEMME_DATA_DIR` when set, otherwise ~/Sagefemme/
pub fn app_data_dir() -> PathBuf {
    resolve_data_dir(std::env::var_os(DATA_DIR_ENV), dirs::home_dir())
}

/// Learning store location
pub fn database_path() -> PathBuf {
    app_data_dir().join(DATABASE_FILE)
}

fn resolve_data_dir(env_override: Option<OsString>, home: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = env_override.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    match home {
        Some(home) => home.join(APP_NAME),
        None => {
            tracing::warn!("Cannot determine home directory, using working directory");
            PathBuf::from(APP_NAME)
        }
    }
}
