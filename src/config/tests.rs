use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use crate::test_support::{EnvGuard, env_lock};

#[test]
fn resolve_config_path_prefers_encore_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", "/tmp/encore-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/encore-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_the_folder_picker() {
    let s = Settings::default();
    assert!(!s.library.recursive);
    assert_eq!(s.library.ordering, OrderingSetting::CallOrder);
    assert_eq!(s.library.extensions, vec!["mp3", "wav", "ogg", "m4a", "flac"]);
    assert_eq!(s.playback.repeat_mode, RepeatModeSetting::None);
    assert_eq!(s.playback.volume, 100);
    assert_eq!(s.ui.theme, Theme::Light);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file_and_parse_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
shuffle = true
repeat_mode = "all"
volume = 40
restore_session = false

[audio]
quit_fade_out_ms = 123

[controls]
scrub_seconds = 9
volume_step = 10

[ui]
header_text = "hello"
theme = "night"

[library]
extensions = ["mp3"]
recursive = true
include_hidden = true
follow_links = false
ordering = "completion"
probe_workers = 4
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("ENCORE__PLAYBACK__VOLUME");

    let s = Settings::load().unwrap();
    assert!(s.playback.shuffle);
    assert_eq!(s.playback.repeat_mode, RepeatModeSetting::RepeatAll);
    assert_eq!(s.playback.volume, 40);
    assert!(!s.playback.restore_session);
    assert_eq!(s.audio.quit_fade_out_ms, 123);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.controls.volume_step, 10);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.theme, Theme::Dark);
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.ordering, OrderingSetting::CompletionOrder);
    assert_eq!(s.library.probe_workers, 4);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
volume = 80
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("ENCORE__PLAYBACK__VOLUME", "25");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.volume, 25);
}

#[test]
fn validate_rejects_unusable_values() {
    let mut s = Settings::default();
    s.library.probe_workers = 0;
    assert!(s.validate().unwrap_err().contains("probe_workers"));

    let mut s = Settings::default();
    s.playback.volume = 101;
    assert!(s.validate().unwrap_err().contains("volume"));

    let mut s = Settings::default();
    s.controls.volume_step = 0;
    assert!(s.validate().unwrap_err().contains("volume_step"));
}

#[test]
fn theme_toggles_between_light_and_dark() {
    assert_eq!(Theme::Light.toggled(), Theme::Dark);
    assert_eq!(Theme::Dark.toggled(), Theme::Light);
}
