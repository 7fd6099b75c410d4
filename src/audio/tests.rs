use std::thread;
use std::time::Duration;

use super::position::{Clock, clamp_position, clamp_volume, seek_target};
use super::*;

#[test]
fn seek_target_clamps_at_zero() {
    assert_eq!(
        seek_target(Duration::from_secs(3), -5, None),
        Duration::ZERO
    );
    assert_eq!(
        seek_target(Duration::from_secs(10), -5, None),
        Duration::from_secs(5)
    );
}

#[test]
fn seek_target_clamps_at_known_total() {
    let total = Some(Duration::from_secs(60));
    assert_eq!(
        seek_target(Duration::from_secs(58), 5, total),
        Duration::from_secs(60)
    );
    assert_eq!(
        seek_target(Duration::from_secs(58), 5, None),
        Duration::from_secs(63)
    );
    assert_eq!(
        clamp_position(Duration::from_secs(90), total),
        Duration::from_secs(60)
    );
}

#[test]
fn clamp_volume_keeps_unit_range() {
    assert_eq!(clamp_volume(1.5), 1.0);
    assert_eq!(clamp_volume(-0.2), 0.0);
    assert_eq!(clamp_volume(0.4), 0.4);
    assert_eq!(clamp_volume(f32::NAN), 0.0);
}

#[test]
fn paused_clock_does_not_advance() {
    let mut clock = Clock::default();
    clock.reset(Duration::from_secs(7), false);
    assert!(!clock.is_running());
    thread::sleep(Duration::from_millis(20));
    assert_eq!(clock.elapsed(), Duration::from_secs(7));
}

#[test]
fn running_clock_accumulates_across_pauses() {
    let mut clock = Clock::default();
    clock.reset(Duration::from_secs(1), true);
    thread::sleep(Duration::from_millis(20));
    clock.pause();
    let paused_at = clock.elapsed();
    assert!(paused_at >= Duration::from_millis(1020));

    thread::sleep(Duration::from_millis(20));
    assert_eq!(clock.elapsed(), paused_at);

    clock.resume();
    thread::sleep(Duration::from_millis(5));
    assert!(clock.elapsed() > paused_at);
}

#[test]
fn playback_info_starts_unloaded_at_full_volume() {
    let info = PlaybackInfo::default();
    assert!(!info.loaded);
    assert!(!info.playing);
    assert!(!info.finished);
    assert_eq!(info.volume, 1.0);
    assert_eq!(info.total, None);
}
