use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::Receiver;

use rand::Rng;
use tracing::debug;

use crate::library::{MediaSource, TrackMetadata, describe};

use super::events::{PlaylistEvent, Subscribers};
use super::model::{InsertionOrder, RepeatMode, Track, TrackId, TrackView};
use super::navigation::{Direction, Policy, step};
use super::refs::RefRegistry;

/// Result of a successful `remove_track`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removed {
    pub id: TrackId,
    /// The removed track was the current one; playback of it should stop.
    pub was_current: bool,
}

/// The single authoritative list of tracks and the current-track cursor.
///
/// Invariant: `current` is `Some(i)` with `i < tracks.len()` whenever there
/// are tracks, and `None` when there are none.
#[derive(Debug)]
pub struct Playlist {
    tracks: Vec<Track>,
    current: Option<usize>,
    shuffle: bool,
    repeat: RepeatMode,
    order: InsertionOrder,
    registry: RefRegistry,
    next_id: u64,
    /// Completion-order reservations still waiting for their probe.
    pending: HashMap<TrackId, Arc<dyn MediaSource>>,
    subscribers: Subscribers,
}

impl Default for Playlist {
    fn default() -> Self {
        Self::new(InsertionOrder::default())
    }
}

impl Playlist {
    pub fn new(order: InsertionOrder) -> Self {
        Self {
            tracks: Vec::new(),
            current: None,
            shuffle: false,
            repeat: RepeatMode::Off,
            order,
            registry: RefRegistry::new(),
            next_id: 0,
            pending: HashMap::new(),
            subscribers: Subscribers::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn order(&self) -> InsertionOrder {
        self.order
    }

    pub fn registry(&self) -> &RefRegistry {
        &self.registry
    }

    /// Completion-order reservations not yet appended.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn position_of(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn subscribe(&mut self) -> Receiver<PlaylistEvent> {
        self.subscribers.subscribe()
    }

    fn next_track_id(&mut self) -> TrackId {
        let id = TrackId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push(&mut self, id: TrackId, source: Arc<dyn MediaSource>, metadata: TrackMetadata) -> usize {
        let playable = self.registry.issue(Arc::clone(&source));
        self.tracks.push(Track {
            id,
            source,
            playable,
            metadata,
        });
        let index = self.tracks.len() - 1;
        self.subscribers.notify(PlaylistEvent::TrackAdded { index, id });

        if self.current.is_none() {
            self.current = Some(0);
            self.subscribers.notify(PlaylistEvent::Selected(self.current));
        }
        index
    }

    /// Describe `source` on the calling thread and append it.
    pub fn add_track(&mut self, source: Arc<dyn MediaSource>) -> &Track {
        let metadata = describe(source.as_ref());
        let id = self.next_track_id();
        let index = self.push(id, source, metadata);
        &self.tracks[index]
    }

    /// Start adding `source` whose metadata will be probed elsewhere. Pair
    /// every call with `complete` once the probe resolves.
    ///
    /// With `InsertionOrder::CallOrder` a placeholder track (file-name
    /// metadata, unknown duration) is appended right away.
    pub fn reserve(&mut self, source: Arc<dyn MediaSource>) -> TrackId {
        let id = self.next_track_id();
        match self.order {
            InsertionOrder::CallOrder => {
                let metadata = TrackMetadata::from_name(source.name());
                self.push(id, source, metadata);
            }
            InsertionOrder::CompletionOrder => {
                self.pending.insert(id, source);
            }
        }
        id
    }

    /// Apply a finished probe. Returns the track's index, or `None` when the
    /// track was removed (or the playlist cleared) in the meantime.
    pub fn complete(&mut self, id: TrackId, metadata: TrackMetadata) -> Option<usize> {
        if let Some(source) = self.pending.remove(&id) {
            return Some(self.push(id, source, metadata));
        }

        let Some(index) = self.position_of(id) else {
            debug!(%id, "discarding probe result for a track no longer listed");
            return None;
        };
        self.tracks[index].metadata = metadata;
        self.subscribers
            .notify(PlaylistEvent::TrackUpdated { index, id });
        Some(index)
    }

    /// Remove the track at `index`, releasing its playable reference.
    pub fn remove_track(&mut self, index: usize) -> Option<Removed> {
        if index >= self.tracks.len() {
            debug!(index, len = self.tracks.len(), "remove_track out of range");
            return None;
        }

        let track = self.tracks.remove(index);
        let was_current = self.current == Some(index);
        let len = self.tracks.len();
        self.current = match self.current {
            _ if len == 0 => None,
            Some(cur) if index < cur => Some(cur - 1),
            Some(cur) if index == cur => Some(cur.min(len - 1)),
            other => other,
        };

        self.subscribers
            .notify(PlaylistEvent::TrackRemoved { index, was_current });
        Some(Removed {
            id: track.id,
            was_current,
        })
    }

    /// Drop every track and pending reservation.
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.pending.clear();
        self.current = None;
        self.subscribers.notify(PlaylistEvent::Cleared);
    }

    /// Make `index` current. Out-of-range indices are ignored.
    pub fn select_track(&mut self, index: usize) -> bool {
        if index >= self.tracks.len() {
            debug!(index, len = self.tracks.len(), "select_track out of range");
            return false;
        }
        self.current = Some(index);
        self.subscribers.notify(PlaylistEvent::Selected(self.current));
        true
    }

    fn policy(&self, manual: bool) -> Policy {
        Policy {
            shuffle: self.shuffle,
            repeat: self.repeat,
            manual,
        }
    }

    /// Index to play after the current track ends, or `None` to stop.
    pub fn advance(&self) -> Option<usize> {
        self.advance_with(&mut rand::thread_rng())
    }

    pub fn advance_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        step(
            self.len(),
            self.current,
            Direction::Forward,
            self.policy(false),
            rng,
        )
    }

    /// Index before the current track, or `None` at the start without repeat.
    pub fn retreat(&self) -> Option<usize> {
        self.retreat_with(&mut rand::thread_rng())
    }

    pub fn retreat_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        step(
            self.len(),
            self.current,
            Direction::Backward,
            self.policy(false),
            rng,
        )
    }

    /// The "next" button: always wraps and ignores `RepeatMode::One`.
    pub fn skip_next(&self) -> Option<usize> {
        step(
            self.len(),
            self.current,
            Direction::Forward,
            self.policy(true),
            &mut rand::thread_rng(),
        )
    }

    /// The "previous" button: always wraps and ignores `RepeatMode::One`.
    pub fn skip_prev(&self) -> Option<usize> {
        step(
            self.len(),
            self.current,
            Direction::Backward,
            self.policy(true),
            &mut rand::thread_rng(),
        )
    }

    fn notify_mode(&mut self) {
        self.subscribers.notify(PlaylistEvent::ModeChanged {
            shuffle: self.shuffle,
            repeat: self.repeat,
        });
    }

    pub fn set_shuffle(&mut self, on: bool) {
        if self.shuffle != on {
            self.shuffle = on;
            self.notify_mode();
        }
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.set_shuffle(!self.shuffle);
        self.shuffle
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        if self.repeat != mode {
            self.repeat = mode;
            self.notify_mode();
        }
    }

    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.set_repeat(self.repeat.cycled());
        self.repeat
    }

    /// Display rows, one per track, in playlist order.
    pub fn view(&self) -> Vec<TrackView> {
        self.tracks
            .iter()
            .enumerate()
            .map(|(i, t)| TrackView {
                display_name: t.metadata.display_name.clone(),
                artist: t.metadata.artist.clone(),
                duration_secs: t
                    .metadata
                    .duration
                    .map(|d| d.as_secs_f64())
                    .unwrap_or(f64::NAN),
                is_current: self.current == Some(i),
            })
            .collect()
    }
}
