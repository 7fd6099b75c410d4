//! Application model types: `App` and `PlaybackState`.
//!
//! `App` owns the playlist and everything the UI shows around it: the list
//! cursor, the search filter, the theme and the status notice.

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::audio::PlaybackHandle;
use crate::config::Theme;
use crate::library::ProbeOutcome;
use crate::playlist::{Playlist, PlaylistEvent, TrackId, TrackView};

/// The playback state of the application.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// A saved playback position waiting for its track to show up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRestore {
    pub index: usize,
    pub position: Duration,
    pub autoplay: bool,
}

/// The main application model.
pub struct App {
    pub playlist: Playlist,
    events: Receiver<PlaylistEvent>,
    /// Display rows, rebuilt whenever the playlist reports a change.
    pub rows: Vec<TrackView>,

    /// Cursor position as a playlist index.
    pub selected: usize,
    pub playback: PlaybackState,
    pub playback_handle: Option<PlaybackHandle>,
    /// Track loaded in the audio thread.
    pub now_playing: Option<TrackId>,
    /// Output volume in percent.
    pub volume: u8,

    pub filter_mode: bool,
    pub filter_query: String,
    pub theme: Theme,
    pub info_window: bool,
    pub header_text: String,
    /// One-line message for the status bar.
    pub notice: Option<String>,
    pub current_dir: Option<PathBuf>,
    pub pending_restore: Option<PendingRestore>,
}

impl App {
    /// Create a new `App` around `playlist`.
    pub fn new(mut playlist: Playlist) -> Self {
        let events = playlist.subscribe();
        let rows = playlist.view();
        Self {
            playlist,
            events,
            rows,
            selected: 0,
            playback: PlaybackState::Stopped,
            playback_handle: None,
            now_playing: None,
            volume: 100,
            filter_mode: false,
            filter_query: String::new(),
            theme: Theme::default(),
            info_window: false,
            header_text: String::new(),
            notice: None,
            current_dir: None,
            pending_restore: None,
        }
    }

    /// Attach a `PlaybackHandle` used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    /// Record the folder the playlist was built from.
    pub fn set_current_dir(&mut self, dir: PathBuf) {
        self.current_dir = Some(dir);
    }

    pub fn set_notice(&mut self, msg: impl Into<String>) {
        self.notice = Some(msg.into());
    }

    /// Return true if the playlist contains any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.playlist.is_empty()
    }

    /// Consume pending playlist notifications. Returns true when anything
    /// changed, in which case the rows were rebuilt.
    pub fn drain_events(&mut self) -> bool {
        let mut changed = false;
        for event in self.events.try_iter() {
            match event {
                PlaylistEvent::TrackRemoved { index, .. } if index < self.selected => {
                    self.selected -= 1;
                }
                PlaylistEvent::Cleared => self.selected = 0,
                _ => {}
            }
            changed = true;
        }
        if changed {
            self.rows = self.playlist.view();
            self.selected = self.selected.min(self.rows.len().saturating_sub(1));
            self.ensure_selected_visible();
        }
        changed
    }

    /// Apply a finished metadata probe.
    pub fn apply_probe(&mut self, outcome: ProbeOutcome<TrackId>) {
        self.playlist.complete(outcome.key, outcome.metadata);
    }

    /// Playlist index of the track loaded in the audio thread.
    pub fn now_playing_index(&self) -> Option<usize> {
        self.now_playing.and_then(|id| self.playlist.position_of(id))
    }

    /// Case-insensitive substring match of `query` against a row's title and
    /// artist.
    pub fn row_matches(row: &TrackView, query: &str) -> bool {
        let query = query.to_lowercase();
        row.display_name.to_lowercase().contains(&query)
            || row.artist.to_lowercase().contains(&query)
    }

    /// Playlist indices visible under the active filter, in playlist order.
    pub fn display_indices(&self) -> Vec<usize> {
        let query = self.filter_query.trim();
        if query.is_empty() {
            return (0..self.rows.len()).collect();
        }
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| Self::row_matches(row, query))
            .map(|(i, _)| i)
            .collect()
    }

    /// Return the next visible index in the current display order after `current`.
    /// Wraps around to the first element.
    pub fn next_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        match display.iter().position(|&i| i == current) {
            Some(p) => Some(display[(p + 1) % display.len()]),
            None => Some(display[0]),
        }
    }

    /// Return the previous visible index in the current display order before `current`.
    /// Wraps around to the last element.
    pub fn prev_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        let last = *display.last()?;

        match display.iter().position(|&i| i == current) {
            Some(0) | None => Some(last),
            Some(p) => Some(display[p - 1]),
        }
    }

    /// Set the selected track index and ensure it is visible in the display.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx;
        self.ensure_selected_visible();
    }

    /// Move selection to the next visible track.
    pub fn next(&mut self) {
        if let Some(next) = self.next_in_view_from(self.selected) {
            self.selected = next;
        }
    }

    /// Move selection to the previous visible track.
    pub fn prev(&mut self) {
        if let Some(prev) = self.prev_in_view_from(self.selected) {
            self.selected = prev;
        }
    }

    pub fn select_first(&mut self) {
        if let Some(&first) = self.display_indices().first() {
            self.selected = first;
        }
    }

    pub fn select_last(&mut self) {
        if let Some(&last) = self.display_indices().last() {
            self.selected = last;
        }
    }

    /// Enter filter mode.
    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.ensure_selected_visible();
    }

    /// Leave filter mode, keeping the query applied.
    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    /// Clear the active filter and restore selection visibility.
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.ensure_selected_visible();
    }

    /// Append a character to the filter query and refresh view.
    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }

    /// Remove the last character from the filter query and refresh view.
    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    /// Keep `selected` on a visible row, falling back to the first one.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        match display.first() {
            None => self.selected = 0,
            Some(&first) if !display.contains(&self.selected) => self.selected = first,
            Some(_) => {}
        }
    }

    pub fn toggle_info_window(&mut self) {
        self.info_window = !self.info_window;
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }
}
