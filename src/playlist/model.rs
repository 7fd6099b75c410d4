use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::library::{MediaSource, TrackMetadata};
use crate::tags::CoverImage;

use super::refs::PlayableRef;

/// Stable identity of a track within one playlist, independent of its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub(crate) u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happens when the current track ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RepeatMode {
    /// Stop after the last track.
    #[default]
    Off,
    /// Replay the current track.
    One,
    /// Wrap from the last track to the first.
    All,
}

impl RepeatMode {
    /// `Off -> All -> One -> Off`.
    pub fn cycled(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatMode::Off => "off",
            RepeatMode::One => "one",
            RepeatMode::All => "all",
        }
    }
}

/// Where tracks whose metadata is probed in the background end up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertionOrder {
    /// A placeholder is appended at `reserve` time; final order = call order.
    #[default]
    CallOrder,
    /// The track is appended when its probe completes.
    CompletionOrder,
}

/// One playlist entry.
///
/// A track owns its source and the playable reference registered for it; the
/// reference is released when the track is dropped.
#[derive(Debug)]
pub struct Track {
    pub(crate) id: TrackId,
    pub(crate) source: Arc<dyn MediaSource>,
    pub(crate) playable: PlayableRef,
    pub(crate) metadata: TrackMetadata,
}

impl Track {
    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn source(&self) -> &Arc<dyn MediaSource> {
        &self.source
    }

    pub fn playable(&self) -> &PlayableRef {
        &self.playable
    }

    pub fn metadata(&self) -> &TrackMetadata {
        &self.metadata
    }

    pub fn display_name(&self) -> &str {
        &self.metadata.display_name
    }

    pub fn artist(&self) -> &str {
        &self.metadata.artist
    }

    pub fn album(&self) -> &str {
        &self.metadata.album
    }

    pub fn cover(&self) -> Option<&CoverImage> {
        self.metadata.cover.as_ref()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.metadata.duration
    }
}

/// A display row derived from the playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackView {
    pub display_name: String,
    pub artist: String,
    /// Seconds, or `NaN` while the duration is unknown.
    pub duration_secs: f64,
    pub is_current: bool,
}
