use std::path::PathBuf;

use super::*;
use crate::test_support::{EnvGuard, env_lock};

#[test]
fn missing_file_is_an_empty_session() {
    let dir = tempfile::tempdir().unwrap();
    let state = SessionState::load_from(&dir.path().join("nope.toml")).unwrap();
    assert_eq!(state, SessionState::default());
}

#[test]
fn save_then_load_keeps_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state.toml");
    let state = SessionState {
        last_index: Some(3),
        last_position_secs: 42.5,
        theme: Theme::Dark,
        last_folder: Some(PathBuf::from("/music/albums")),
    };

    state.save_to(&path).unwrap();
    assert_eq!(SessionState::load_from(&path).unwrap(), state);
}

#[test]
fn partial_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.toml");
    std::fs::write(&path, "theme = \"night\"\n").unwrap();

    let state = SessionState::load_from(&path).unwrap();
    assert_eq!(state.theme, Theme::Dark);
    assert_eq!(state.last_index, None);
    assert_eq!(state.last_position_secs, 0.0);
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.toml");
    std::fs::write(&path, "last_index = \"three\"\n").unwrap();

    let err = SessionState::load_from(&path).unwrap_err();
    assert!(matches!(err, StateError::Parse { .. }));
}

#[test]
fn state_path_prefers_env_then_xdg_then_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ENCORE_STATE_PATH", "/tmp/encore-state.toml");
    assert_eq!(
        resolve_state_path().unwrap(),
        PathBuf::from("/tmp/encore-state.toml")
    );

    let _g2 = EnvGuard::remove("ENCORE_STATE_PATH");
    let _g3 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state");
    assert_eq!(
        resolve_state_path().unwrap(),
        PathBuf::from("/tmp/xdg-state").join("encore").join("state.toml")
    );

    let _g4 = EnvGuard::remove("XDG_STATE_HOME");
    let _g5 = EnvGuard::set("HOME", "/tmp/home-dir");
    assert_eq!(
        resolve_state_path().unwrap(),
        PathBuf::from("/tmp/home-dir/.local/state/encore/state.toml")
    );
}
