//! Session state persisted between runs: where playback stopped and which
//! theme was active.
//!
//! Read once at startup, written once at teardown. Stored as TOML at
//! `$ENCORE_STATE_PATH`, else `$XDG_STATE_HOME/encore/state.toml`, else
//! `~/.local/state/encore/state.toml`.

use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Theme;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed session file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("cannot encode session state: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub last_index: Option<usize>,
    pub last_position_secs: f64,
    pub theme: Theme,
    pub last_folder: Option<PathBuf>,
}

impl SessionState {
    /// Read the session file. A missing file is an empty session.
    pub fn load_from(path: &Path) -> Result<Self, StateError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(StateError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&text).map_err(|source| StateError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the session file, creating its directory when needed.
    pub fn save_to(&self, path: &Path) -> Result<(), StateError> {
        let text = toml::to_string_pretty(self)?;
        let io_err = |source| StateError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        fs::write(path, text).map_err(io_err)
    }
}

/// Resolve the session file from `ENCORE_STATE_PATH` or XDG defaults.
pub fn resolve_state_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("ENCORE_STATE_PATH") {
        return Some(PathBuf::from(p));
    }
    let state_home = env::var_os("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state")))?;
    Some(state_home.join("encore").join("state.toml"))
}

#[cfg(test)]
mod tests;
