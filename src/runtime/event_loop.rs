use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::warn;

use crate::app::{App, PlaybackState};
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config;
use crate::library::ProbePool;
use crate::playlist::TrackId;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// What a key press asks the loop to do next.
pub enum KeyAction {
    Continue,
    Audio(AudioCmd),
    Quit,
}

impl From<Option<AudioCmd>> for KeyAction {
    fn from(cmd: Option<AudioCmd>) -> Self {
        cmd.map_or(KeyAction::Continue, KeyAction::Audio)
    }
}

/// Main terminal event loop: applies finished probes, syncs with the audio
/// thread, draws, and handles input. Returns `Ok(())` when shutdown is
/// requested; the caller stops the audio thread.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    probes: &ProbePool<TrackId>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Some(outcome) = probes.try_next() {
            app.apply_probe(outcome);
        }
        app.drain_events();
        forward(audio_player, app.apply_pending_restore());
        forward(audio_player, app.sync_playback());

        let display = app.display_indices();
        terminal.draw(|f| ui::draw(f, app, &display, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key_event(key, settings, app, state) {
                    KeyAction::Continue => {}
                    KeyAction::Audio(cmd) => forward(audio_player, Some(cmd)),
                    KeyAction::Quit => break,
                }
            }
        }
    }

    Ok(())
}

fn forward(audio_player: &AudioPlayer, cmd: Option<AudioCmd>) {
    if let Some(cmd) = cmd {
        if audio_player.send(cmd).is_err() {
            warn!("audio thread is gone, command dropped");
        }
    }
}

pub fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    state: &mut EventLoopState,
) -> KeyAction {
    if app.filter_mode {
        state.pending_gg = false;
        return handle_filter_key(key, app);
    }

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    let scrub = settings.controls.scrub_seconds.min(i64::MAX as u64) as i64;
    let step = i16::from(settings.controls.volume_step);

    match key.code {
        KeyCode::Char('q') => return KeyAction::Quit,
        KeyCode::Char('/') => app.enter_filter_mode(),
        KeyCode::Char('s') => app.toggle_shuffle(),
        KeyCode::Char('r') => {
            app.cycle_repeat();
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => {
            let is_playing_selected = app.playback == PlaybackState::Playing
                && app.now_playing_index() == Some(app.selected);
            if !is_playing_selected {
                return app.play_selected().into();
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => return app.toggle_play().into(),
        KeyCode::Char('l') => return app.next_track().into(),
        KeyCode::Char('h') => return app.prev_track().into(),
        KeyCode::Char('L') => return app.scrub(scrub).into(),
        KeyCode::Char('H') => return app.scrub(-scrub).into(),
        KeyCode::Char(c @ '0'..='9') => {
            let tenths = c.to_digit(10).unwrap_or(0) as u8;
            return app.seek_to_tenths(tenths).into();
        }
        KeyCode::Char('+') | KeyCode::Char('=') => return KeyAction::Audio(app.change_volume(step)),
        KeyCode::Char('-') => return KeyAction::Audio(app.change_volume(-step)),
        KeyCode::Char('d') => return app.remove_selected().into(),
        KeyCode::Char('c') => return app.clear_playlist().into(),
        KeyCode::Char('n') => app.toggle_theme(),
        KeyCode::Char('i') => app.toggle_info_window(),
        KeyCode::Esc => {
            if app.info_window {
                app.toggle_info_window();
            } else if !app.filter_query.is_empty() {
                app.clear_filter();
            }
        }
        _ => {}
    }

    KeyAction::Continue
}

fn handle_filter_key(key: KeyEvent, app: &mut App) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Backspace => app.pop_filter_char(),
        KeyCode::Char('j') | KeyCode::Char('n') if ctrl => app.next(),
        KeyCode::Char('k') | KeyCode::Char('p') if ctrl => app.prev(),
        KeyCode::Down => app.next(),
        KeyCode::Up => app.prev(),
        KeyCode::Char(c) if !c.is_control() => app.push_filter_char(c),
        KeyCode::Enter => {
            if app.display_indices().is_empty() {
                return KeyAction::Continue;
            }
            app.exit_filter_mode();
            return app.play_selected().into();
        }
        _ => {}
    }
    KeyAction::Continue
}
