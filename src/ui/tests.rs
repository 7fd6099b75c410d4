use std::time::Duration;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use super::*;
use crate::playlist::Playlist;
use crate::test_support::MemorySource;

fn render(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(110, 30)).unwrap();
    let display = app.display_indices();
    terminal
        .draw(|f| draw(f, app, &display, &ControlsSettings::default()))
        .unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[test]
fn unknown_duration_renders_as_dashes() {
    assert_eq!(format_secs(f64::NAN), "--:--");
    assert_eq!(format_secs(125.9), "02:05");
    assert_eq!(format_mmss(Duration::from_secs(3600)), "60:00");
}

#[test]
fn controls_text_mentions_scrub_step() {
    let text = controls_text(7);
    assert!(text.contains("scrub -/+7s"));
    assert!(text.contains("[q] quit"));
}

#[test]
fn centered_rect_stays_inside_area() {
    let area = Rect::new(0, 0, 40, 12);
    let r = centered_rect_sized(72, 10, area);
    assert!(r.x + r.width <= area.width);
    assert!(r.y + r.height <= area.height);
}

#[test]
fn draws_rows_status_and_now_playing() {
    let mut playlist = Playlist::default();
    playlist.add_track(MemorySource::new("alpha.mp3").with_duration(90).shared());
    playlist.add_track(MemorySource::new("bravo.mp3").shared());
    let mut app = App::new(playlist);
    app.set_notice("Shuffle on");

    let screen = render(&app);
    assert!(screen.contains("alpha"));
    assert!(screen.contains("bravo"));
    assert!(screen.contains("01:30"));
    assert!(screen.contains("--:--"));
    assert!(screen.contains("REPEAT: Off"));
    assert!(screen.contains("Shuffle on"));
    assert!(screen.contains("Nothing playing"));

    let _ = app.play_index(0, Duration::ZERO);
    let screen = render(&app);
    assert!(!screen.contains("Nothing playing"));
    assert!(screen.contains("Cover: none"));
}

#[test]
fn info_popup_shows_the_playable_reference() {
    let mut playlist = Playlist::default();
    playlist.add_track(MemorySource::new("alpha.mp3").shared());
    let mut app = App::new(playlist);
    app.toggle_info_window();

    let screen = render(&app);
    assert!(screen.contains("encore://track/"));
    assert!(screen.contains("Album:"));
}
