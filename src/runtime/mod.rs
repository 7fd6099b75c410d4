use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::audio::AudioPlayer;
use crate::state::{SessionState, resolve_state_path};

mod event_loop;
mod logging;
mod settings;
mod startup;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let state_path = resolve_state_path();
    logging::init(state_path.as_deref());
    info!(version = env!("CARGO_PKG_VERSION"), "encore starting");

    let settings = settings::load_settings();
    let session = state_path.as_deref().and_then(load_session);

    let args: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    let paths = startup::startup_paths(args, session.as_ref());
    let startup::Startup { mut app, probes } = startup::build(&settings, paths, session.as_ref());

    let audio_player = AudioPlayer::new(f32::from(app.volume) / 100.0);
    app.set_playback_handle(audio_player.playback_handle());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &audio_player,
        &probes,
        &mut state,
    );

    // Snapshot before the audio thread unloads and resets its clock.
    let snapshot = app.session_snapshot();
    audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(path) = &state_path {
        if let Err(e) = snapshot.save_to(path) {
            warn!(error = %e, "could not save session");
        }
    }

    run_result
}

/// Read the last session. Absent or unreadable files mean a fresh start.
fn load_session(path: &Path) -> Option<SessionState> {
    if !path.exists() {
        return None;
    }
    SessionState::load_from(path)
        .map_err(|e| warn!(error = %e, "ignoring session file"))
        .ok()
}
