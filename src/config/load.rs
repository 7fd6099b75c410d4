use std::{env, path::PathBuf};

use super::schema::Settings;

/// `Settings::load` reads environment variables first (prefix `ENCORE__`), then
/// an optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = resolve_config_path() {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("ENCORE")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("library.extensions")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Reject values the player cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        if self.library.probe_workers == 0 {
            return Err("library.probe_workers must be >= 1".to_string());
        }
        if self.playback.volume > 100 {
            return Err(format!(
                "playback.volume must be within 0..=100 (got {})",
                self.playback.volume
            ));
        }
        if self.controls.volume_step == 0 {
            return Err("controls.volume_step must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `ENCORE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("ENCORE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// `$XDG_CONFIG_HOME/encore/config.toml`, or `~/.config/encore/config.toml`
/// when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;

    Some(config_home.join("encore").join("config.toml"))
}
