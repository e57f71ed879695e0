// gittools platform paths
// Resolves where the background process keeps its database.

use std::env;
use std::path::PathBuf;

/// Overrides the data directory when set.
pub const DATA_DIR_ENV: &str = "GITTOOLS_DATA_DIR";

const APP_DIR_NAME: &str = "gittools";

/// Returns the data directory for gittools.
///
/// `$GITTOOLS_DATA_DIR` if set, otherwise the platform data directory
/// (`~/.local/share/gittools`, `~/Library/Application Support/gittools`,
/// `%APPDATA%\gittools`), falling back to the temp directory.
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::data_dir()
        .unwrap_or_else(env::temp_dir)
        .join(APP_DIR_NAME)
}

/// Path of the sync storage database inside [`get_data_dir`].
pub fn default_db_path() -> PathBuf {
    get_data_dir().join("gittools.db")
}
