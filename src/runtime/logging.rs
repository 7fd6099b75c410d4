use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "ENCORE_LOG";
const DEFAULT_FILTER: &str = "encore=info";

/// Where the log file lives: next to the session state file.
pub fn log_path(state_path: &Path) -> Option<PathBuf> {
    state_path.parent().map(|dir| dir.join("encore.log"))
}

/// Install the global subscriber writing to `encore.log`. The terminal
/// belongs to the UI, so nothing is logged when the file cannot be opened.
pub fn init(state_path: Option<&Path>) {
    let Some(path) = state_path.and_then(log_path) else {
        return;
    };
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();
}
