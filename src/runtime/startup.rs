use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::app::App;
use crate::config;
use crate::library::{MediaSource, ProbePool, collect_sources, describe};
use crate::playlist::{InsertionOrder, Playlist, RepeatMode, TrackId};
use crate::state::SessionState;

/// The model built at startup plus the pool still probing its tracks.
pub struct Startup {
    pub app: App,
    pub probes: ProbePool<TrackId>,
}

pub fn repeat_mode(setting: config::RepeatModeSetting) -> RepeatMode {
    match setting {
        config::RepeatModeSetting::None => RepeatMode::Off,
        config::RepeatModeSetting::RepeatOne => RepeatMode::One,
        config::RepeatModeSetting::RepeatAll => RepeatMode::All,
    }
}

pub fn insertion_order(setting: config::OrderingSetting) -> InsertionOrder {
    match setting {
        config::OrderingSetting::CallOrder => InsertionOrder::CallOrder,
        config::OrderingSetting::CompletionOrder => InsertionOrder::CompletionOrder,
    }
}

/// Command-line paths win, then the folder of the last session, then the
/// working directory.
pub fn startup_paths(args: Vec<PathBuf>, session: Option<&SessionState>) -> Vec<PathBuf> {
    if !args.is_empty() {
        return args;
    }
    if let Some(dir) = session
        .and_then(|s| s.last_folder.clone())
        .filter(|dir| dir.is_dir())
    {
        return vec![dir];
    }
    vec![env::current_dir().unwrap_or_else(|_| PathBuf::from("."))]
}

/// Scan `paths`, queue every source for probing and build the `App`.
pub fn build(
    settings: &config::Settings,
    paths: Vec<PathBuf>,
    session: Option<&SessionState>,
) -> Startup {
    let report = collect_sources(&paths, &settings.library);

    let mut playlist = Playlist::new(insertion_order(settings.library.ordering));
    playlist.set_shuffle(settings.playback.shuffle);
    playlist.set_repeat(repeat_mode(settings.playback.repeat_mode));

    let probes = ProbePool::new(settings.library.probe_workers);
    for source in report.sources {
        let source: Arc<dyn MediaSource> = Arc::new(source);
        let id = playlist.reserve(Arc::clone(&source));
        if let Err(e) = probes.submit(id, Arc::clone(&source)) {
            warn!(error = %e, name = source.name(), "describing in place");
            playlist.complete(id, describe(source.as_ref()));
        }
    }
    info!(queued = playlist.pending(), "library scan queued for probing");

    let mut app = App::new(playlist);
    app.header_text = settings.ui.header_text.clone();
    app.theme = settings.ui.theme;
    app.volume = settings.playback.volume.min(100);

    if let [dir] = paths.as_slice() {
        if dir.is_dir() {
            app.set_current_dir(dir.canonicalize().unwrap_or_else(|_| dir.clone()));
        }
    }
    if !report.notices.is_empty() {
        app.set_notice(report.notices.join("; "));
    }

    if settings.playback.restore_session {
        if let Some(session) = session {
            app.theme = session.theme;
            let same_folder = session.last_folder.is_some() && session.last_folder == app.current_dir;
            if same_folder {
                app.restore_from(session, true);
            }
        }
    }

    Startup { app, probes }
}
