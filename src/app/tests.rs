use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::*;
use crate::audio::{AudioCmd, PlaybackHandle, PlaybackInfo};
use crate::config::Theme;
use crate::library::TrackMetadata;
use crate::playlist::{InsertionOrder, Playlist, RepeatMode};
use crate::state::SessionState;
use crate::test_support::MemorySource;

fn app_with(names: &[&str]) -> App {
    let mut playlist = Playlist::default();
    for name in names {
        playlist.add_track(MemorySource::new(name).shared());
    }
    let mut app = App::new(playlist);
    app.drain_events();
    app
}

fn attach_handle(app: &mut App) -> PlaybackHandle {
    let handle: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));
    app.set_playback_handle(handle.clone());
    handle
}

fn played_name(cmd: Option<AudioCmd>) -> String {
    match cmd {
        Some(AudioCmd::Play { source, .. }) => source.name().to_string(),
        other => panic!("expected Play, got {other:?}"),
    }
}

#[test]
fn filter_is_a_case_insensitive_substring_match() {
    let mut app = app_with(&["Alpha.mp3", "Beta.mp3", "Gamma.mp3", "Delta.mp3"]);
    app.filter_query = "ET".into();
    assert_eq!(app.display_indices(), vec![1, 3]);

    // Subsequences do not match.
    app.filter_query = "aa".into();
    assert!(app.display_indices().is_empty());

    app.filter_query = "   ".into();
    assert_eq!(app.display_indices(), vec![0, 1, 2, 3]);
}

#[test]
fn filter_matches_artist_too() {
    let mut playlist = Playlist::new(InsertionOrder::CallOrder);
    let id = playlist.reserve(MemorySource::new("one.mp3").shared());
    playlist.reserve(MemorySource::new("two.mp3").shared());
    playlist.complete(
        id,
        TrackMetadata {
            artist: "Nina Simone".into(),
            ..TrackMetadata::from_name("one.mp3")
        },
    );
    let mut app = App::new(playlist);
    app.drain_events();

    app.filter_query = "simone".into();
    assert_eq!(app.display_indices(), vec![0]);
}

#[test]
fn next_prev_in_view_helpers_wrap_within_the_filter() {
    let mut app = app_with(&["Alpha.mp3", "Beta.mp3", "Gamma.mp3"]);
    app.filter_query = "et".into(); // only Beta is visible

    assert_eq!(app.next_in_view_from(0), Some(1));
    assert_eq!(app.prev_in_view_from(0), Some(1));
    assert_eq!(app.next_in_view_from(1), Some(1));
    assert_eq!(app.prev_in_view_from(1), Some(1));
}

#[test]
fn cursor_moves_and_jumps() {
    let mut app = app_with(&["a.mp3", "b.mp3", "c.mp3"]);
    app.next();
    assert_eq!(app.selected, 1);
    app.select_last();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
    app.prev();
    assert_eq!(app.selected, 2);
    app.select_first();
    assert_eq!(app.selected, 0);
}

#[test]
fn filter_keeps_cursor_on_a_visible_row() {
    let mut app = app_with(&["Alpha.mp3", "Beta.mp3", "Gamma.mp3"]);
    app.enter_filter_mode();
    for c in "gam".chars() {
        app.push_filter_char(c);
    }
    assert_eq!(app.selected, 2);
    app.clear_filter();
    assert!(!app.filter_mode);
    assert_eq!(app.display_indices().len(), 3);
}

#[test]
fn rows_follow_playlist_events() {
    let mut app = app_with(&["a.mp3"]);
    assert_eq!(app.rows.len(), 1);

    app.playlist.add_track(MemorySource::new("b.mp3").shared());
    assert_eq!(app.rows.len(), 1);
    assert!(app.drain_events());
    assert_eq!(app.rows.len(), 2);
    assert!(!app.drain_events());
}

#[test]
fn removing_above_the_cursor_keeps_it_on_the_same_track() {
    let mut app = app_with(&["a.mp3", "b.mp3", "c.mp3"]);
    app.set_selected(2);
    app.playlist.remove_track(0);
    app.drain_events();
    assert_eq!(app.selected, 1);
    assert_eq!(app.rows[app.selected].display_name, "c");
}

#[test]
fn play_selected_resolves_the_track_source() {
    let mut app = app_with(&["a.mp3", "b.mp3"]);
    app.set_selected(1);

    assert_eq!(played_name(app.play_selected()), "b.mp3");
    assert_eq!(app.playback, PlaybackState::Playing);
    assert_eq!(app.playlist.current(), Some(1));
    assert_eq!(app.now_playing_index(), Some(1));
}

#[test]
fn toggle_play_starts_then_pauses_then_resumes() {
    let mut app = app_with(&["a.mp3"]);
    assert_eq!(played_name(app.toggle_play()), "a.mp3");
    assert!(matches!(app.toggle_play(), Some(AudioCmd::TogglePause)));
    assert_eq!(app.playback, PlaybackState::Paused);
    assert!(matches!(app.toggle_play(), Some(AudioCmd::TogglePause)));
    assert_eq!(app.playback, PlaybackState::Playing);
}

#[test]
fn toggle_play_on_empty_playlist_does_nothing() {
    let mut app = app_with(&[]);
    assert!(app.toggle_play().is_none());
    assert!(app.play_selected().is_none());
    assert!(app.next_track().is_none());
}

#[test]
fn finished_track_advances_or_stops_at_the_end() {
    let mut app = app_with(&["a.mp3", "b.mp3"]);
    let handle = attach_handle(&mut app);
    app.play_index(1, Duration::ZERO);

    handle.lock().unwrap().finished = true;
    assert!(matches!(app.sync_playback(), Some(AudioCmd::Stop)));
    assert_eq!(app.playback, PlaybackState::Stopped);
    assert!(!handle.lock().unwrap().finished);

    app.playlist.set_repeat(RepeatMode::All);
    app.play_index(1, Duration::ZERO);
    handle.lock().unwrap().finished = true;
    assert_eq!(played_name(app.sync_playback()), "a.mp3");
    assert_eq!(app.selected, 0);
}

#[test]
fn next_button_wraps_even_without_repeat() {
    let mut app = app_with(&["a.mp3", "b.mp3"]);
    app.play_index(1, Duration::ZERO);
    assert_eq!(played_name(app.next_track()), "a.mp3");
    assert_eq!(played_name(app.prev_track()), "b.mp3");
}

#[test]
fn playback_errors_surface_as_a_notice() {
    let mut app = app_with(&["a.mp3"]);
    let handle = attach_handle(&mut app);
    app.play_selected();

    handle.lock().unwrap().error = Some("bad data".into());
    assert!(app.sync_playback().is_none());
    assert_eq!(app.playback, PlaybackState::Stopped);
    assert!(app.notice.as_deref().unwrap().contains("bad data"));
}

#[test]
fn sync_playback_mirrors_pause_state() {
    let mut app = app_with(&["a.mp3"]);
    let handle = attach_handle(&mut app);
    app.play_selected();
    {
        let mut info = handle.lock().unwrap();
        info.loaded = true;
        info.playing = false;
    }
    app.sync_playback();
    assert_eq!(app.playback, PlaybackState::Paused);
}

#[test]
fn removing_the_playing_track_stops_playback() {
    let mut app = app_with(&["a.mp3", "b.mp3"]);
    app.play_index(0, Duration::ZERO);
    app.set_selected(1);
    assert!(app.remove_selected().is_none());
    app.drain_events();

    app.set_selected(0);
    assert!(matches!(app.remove_selected(), Some(AudioCmd::Stop)));
    assert_eq!(app.now_playing, None);
    assert!(app.playlist.is_empty());
}

#[test]
fn clear_stops_only_when_something_is_loaded() {
    let mut app = app_with(&["a.mp3"]);
    assert!(app.clear_playlist().is_none());

    let mut app = app_with(&["a.mp3"]);
    app.play_selected();
    assert!(matches!(app.clear_playlist(), Some(AudioCmd::Stop)));
    assert_eq!(app.playlist.registry().live(), 0);
}

#[test]
fn volume_steps_are_clamped() {
    let mut app = app_with(&[]);
    app.volume = 95;
    assert!(matches!(app.change_volume(10), AudioCmd::SetVolume(v) if v == 1.0));
    assert_eq!(app.volume, 100);
    app.volume = 3;
    app.change_volume(-5);
    assert_eq!(app.volume, 0);
}

#[test]
fn scrub_needs_a_loaded_track() {
    let mut app = app_with(&["a.mp3"]);
    assert!(app.scrub(5).is_none());
    app.play_selected();
    assert!(matches!(app.scrub(-5), Some(AudioCmd::SeekBy(-5))));
}

#[test]
fn digit_seek_uses_the_decoder_length() {
    let mut app = app_with(&["a.mp3"]);
    let handle = attach_handle(&mut app);
    assert!(app.seek_to_tenths(3).is_none());

    app.play_selected();
    handle.lock().unwrap().total = Some(Duration::from_secs(200));
    assert!(matches!(
        app.seek_to_tenths(3),
        Some(AudioCmd::SeekTo(at)) if at == Duration::from_secs(60)
    ));
    assert!(matches!(
        app.seek_to_tenths(0),
        Some(AudioCmd::SeekTo(at)) if at.is_zero()
    ));
}

#[test]
fn digit_seek_falls_back_to_the_probed_length() {
    let mut playlist = Playlist::default();
    playlist.add_track(MemorySource::new("a.mp3").with_duration(100).shared());
    playlist.add_track(MemorySource::new("b.mp3").shared());
    let mut app = App::new(playlist);

    app.play_index(0, Duration::ZERO);
    assert!(matches!(
        app.seek_to_tenths(7),
        Some(AudioCmd::SeekTo(at)) if at == Duration::from_secs(70)
    ));

    // Nothing knows how long b is: only the start is reachable.
    app.play_index(1, Duration::ZERO);
    assert!(app.seek_to_tenths(5).is_none());
    assert!(matches!(app.seek_to_tenths(0), Some(AudioCmd::SeekTo(_))));
}

#[test]
fn restore_waits_for_its_track_then_resumes() {
    let mut playlist = Playlist::new(InsertionOrder::CompletionOrder);
    let a = playlist.reserve(MemorySource::new("a.mp3").shared());
    let b = playlist.reserve(MemorySource::new("b.mp3").shared());
    let mut app = App::new(playlist);

    let session = SessionState {
        last_index: Some(1),
        last_position_secs: 30.0,
        theme: Theme::Dark,
        last_folder: None,
    };
    app.restore_from(&session, true);
    assert_eq!(app.theme, Theme::Dark);

    app.playlist.complete(a, TrackMetadata::from_name("a.mp3"));
    assert!(app.apply_pending_restore().is_none());
    assert!(app.pending_restore.is_some());

    app.playlist.complete(b, TrackMetadata::from_name("b.mp3"));
    match app.apply_pending_restore() {
        Some(AudioCmd::Play { source, start_at }) => {
            assert_eq!(source.name(), "b.mp3");
            assert_eq!(start_at, Duration::from_secs(30));
        }
        other => panic!("expected Play, got {other:?}"),
    }
    assert!(app.pending_restore.is_none());
}

#[test]
fn stale_restore_index_is_dropped() {
    let mut app = app_with(&["a.mp3"]);
    app.restore_from(
        &SessionState {
            last_index: Some(4),
            ..SessionState::default()
        },
        true,
    );
    assert!(app.apply_pending_restore().is_none());
    assert!(app.pending_restore.is_none());
}

#[test]
fn session_snapshot_records_playing_track_and_position() {
    let mut app = app_with(&["a.mp3", "b.mp3"]);
    let handle = attach_handle(&mut app);
    app.toggle_theme();
    app.set_current_dir("/music".into());
    app.play_index(1, Duration::ZERO);
    handle.lock().unwrap().elapsed = Duration::from_millis(12_500);

    let snap = app.session_snapshot();
    assert_eq!(snap.last_index, Some(1));
    assert_eq!(snap.last_position_secs, 12.5);
    assert_eq!(snap.theme, Theme::Dark);
    assert_eq!(snap.last_folder, Some("/music".into()));
}
