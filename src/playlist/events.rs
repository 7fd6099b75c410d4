use std::sync::mpsc::{self, Receiver, Sender};

use super::model::{RepeatMode, TrackId};

/// Change notifications published by a `Playlist`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistEvent {
    TrackAdded { index: usize, id: TrackId },
    /// Metadata for an existing track arrived.
    TrackUpdated { index: usize, id: TrackId },
    TrackRemoved { index: usize, was_current: bool },
    Cleared,
    Selected(Option<usize>),
    ModeChanged { shuffle: bool, repeat: RepeatMode },
}

#[derive(Debug, Default)]
pub(crate) struct Subscribers {
    senders: Vec<Sender<PlaylistEvent>>,
}

impl Subscribers {
    pub fn subscribe(&mut self) -> Receiver<PlaylistEvent> {
        let (tx, rx) = mpsc::channel();
        self.senders.push(tx);
        rx
    }

    /// Deliver `event` to every live subscriber; dropped receivers are pruned.
    pub fn notify(&mut self, event: PlaylistEvent) {
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
