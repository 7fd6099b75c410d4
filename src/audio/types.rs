//! Commands, shared playback info and errors for the audio thread.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

use crate::library::{MediaSource, SourceError};

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no usable audio output: {0}")]
    Output(String),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("cannot decode {name}: {reason}")]
    Decode { name: String, reason: String },
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace whatever is loaded with `source`, starting `start_at` in.
    Play {
        source: Arc<dyn MediaSource>,
        start_at: Duration,
    },
    /// Toggle pause/resume.
    TogglePause,
    /// Stop playback and unload the current source.
    Stop,
    /// Seek by the specified number of seconds (positive or negative).
    SeekBy(i64),
    /// Seek to an absolute position.
    SeekTo(Duration),
    /// Output volume, `0.0..=1.0`.
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Runtime playback information shared with the UI.
#[derive(Debug, Clone)]
pub struct PlaybackInfo {
    /// A source is loaded (playing or paused).
    pub loaded: bool,
    pub playing: bool,
    /// Elapsed playback time for the loaded source.
    pub elapsed: Duration,
    /// Decoder-reported length of the loaded source, when known.
    pub total: Option<Duration>,
    pub volume: f32,
    /// Raised when the loaded source played to its end. The reader clears it.
    pub finished: bool,
    /// Why the last `Play` failed, if it did. The reader clears it.
    pub error: Option<String>,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            loaded: false,
            playing: false,
            elapsed: Duration::ZERO,
            total: None,
            volume: 1.0,
            finished: false,
            error: None,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
