//! Transport actions on `App`.
//!
//! Each action updates the model and returns the command, if any, the audio
//! thread should receive. The caller forwards it; nothing here talks to the
//! audio thread directly.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::audio::AudioCmd;
use crate::playlist::RepeatMode;
use crate::state::SessionState;

use super::model::{App, PendingRestore, PlaybackState};

impl App {
    /// Make `index` current and start it at `start_at`.
    pub fn play_index(&mut self, index: usize, start_at: Duration) -> Option<AudioCmd> {
        if !self.playlist.select_track(index) {
            return None;
        }
        let track = self.playlist.get(index)?;
        let Some(source) = self.playlist.registry().resolve(track.playable().locator()) else {
            warn!(locator = track.playable().locator(), "playable reference no longer resolves");
            return None;
        };

        self.now_playing = Some(track.id());
        self.playback = PlaybackState::Playing;
        if !self.filter_mode {
            self.selected = index;
        }
        if let Some(handle) = &self.playback_handle {
            if let Ok(mut info) = handle.lock() {
                info.finished = false;
            }
        }
        Some(AudioCmd::Play { source, start_at })
    }

    /// Play the track under the cursor.
    pub fn play_selected(&mut self) -> Option<AudioCmd> {
        if !self.has_tracks() {
            return None;
        }
        self.play_index(self.selected, Duration::ZERO)
    }

    /// Space / `p`: start the current track when stopped, otherwise pause or
    /// resume.
    pub fn toggle_play(&mut self) -> Option<AudioCmd> {
        match self.playback {
            PlaybackState::Stopped => {
                let index = self.playlist.current()?;
                self.play_index(index, Duration::ZERO)
            }
            PlaybackState::Playing => {
                self.playback = PlaybackState::Paused;
                Some(AudioCmd::TogglePause)
            }
            PlaybackState::Paused => {
                self.playback = PlaybackState::Playing;
                Some(AudioCmd::TogglePause)
            }
        }
    }

    pub fn stop(&mut self) -> AudioCmd {
        self.now_playing = None;
        self.playback = PlaybackState::Stopped;
        AudioCmd::Stop
    }

    /// The "next" button.
    pub fn next_track(&mut self) -> Option<AudioCmd> {
        let index = self.playlist.skip_next()?;
        self.play_index(index, Duration::ZERO)
    }

    /// The "previous" button.
    pub fn prev_track(&mut self) -> Option<AudioCmd> {
        let index = self.playlist.skip_prev()?;
        self.play_index(index, Duration::ZERO)
    }

    /// The loaded track played to its end: follow the playlist's
    /// end-of-track rule.
    pub fn on_finished(&mut self) -> Option<AudioCmd> {
        match self.playlist.advance() {
            Some(index) => self.play_index(index, Duration::ZERO),
            None => {
                info!("end of playlist");
                Some(self.stop())
            }
        }
    }

    pub fn scrub(&self, secs: i64) -> Option<AudioCmd> {
        (self.playback != PlaybackState::Stopped).then_some(AudioCmd::SeekBy(secs))
    }

    /// Jump to `tenths` tenths of the loaded track (digit keys). The length
    /// comes from the decoder, else from the probe; without either only the
    /// start is reachable.
    pub fn seek_to_tenths(&self, tenths: u8) -> Option<AudioCmd> {
        if self.playback == PlaybackState::Stopped {
            return None;
        }
        if tenths == 0 {
            return Some(AudioCmd::SeekTo(Duration::ZERO));
        }
        let total = self
            .playback_handle
            .as_ref()
            .and_then(|h| h.lock().ok().and_then(|info| info.total))
            .or_else(|| {
                self.now_playing_index()
                    .and_then(|i| self.playlist.get(i))
                    .and_then(|track| track.duration())
            })?;
        Some(AudioCmd::SeekTo(total.mul_f64(f64::from(tenths.min(10)) / 10.0)))
    }

    /// Move the volume by `delta` percent, within `0..=100`.
    pub fn change_volume(&mut self, delta: i16) -> AudioCmd {
        self.volume = (i16::from(self.volume) + delta).clamp(0, 100) as u8;
        AudioCmd::SetVolume(f32::from(self.volume) / 100.0)
    }

    /// Remove the track under the cursor; stops playback when it was loaded.
    pub fn remove_selected(&mut self) -> Option<AudioCmd> {
        let removed = self.playlist.remove_track(self.selected)?;
        self.set_notice(format!("Removed track {}", self.selected + 1));
        (self.now_playing == Some(removed.id)).then(|| self.stop())
    }

    pub fn clear_playlist(&mut self) -> Option<AudioCmd> {
        self.playlist.clear();
        self.set_notice("Playlist cleared");
        self.now_playing.is_some().then(|| self.stop())
    }

    pub fn toggle_shuffle(&mut self) {
        let on = self.playlist.toggle_shuffle();
        self.set_notice(if on { "Shuffle on" } else { "Shuffle off" });
    }

    pub fn cycle_repeat(&mut self) -> RepeatMode {
        let mode = self.playlist.cycle_repeat();
        self.set_notice(format!("Repeat: {}", mode.label()));
        mode
    }

    /// Pull the audio thread's state into the model. Returns the follow-up
    /// command when the loaded track finished.
    pub fn sync_playback(&mut self) -> Option<AudioCmd> {
        let handle = self.playback_handle.clone()?;
        let (finished, error, loaded, playing) = {
            let mut info = handle.lock().ok()?;
            let finished = std::mem::take(&mut info.finished);
            (finished, info.error.take(), info.loaded, info.playing)
        };

        if let Some(e) = error {
            self.set_notice(format!("Cannot play: {e}"));
            self.now_playing = None;
            self.playback = PlaybackState::Stopped;
            return None;
        }
        if finished {
            return self.on_finished();
        }
        if loaded {
            self.playback = if playing {
                PlaybackState::Playing
            } else {
                PlaybackState::Paused
            };
        }
        None
    }

    /// Queue a saved position to be resumed once its track is listed.
    pub fn restore_from(&mut self, session: &SessionState, autoplay: bool) {
        self.theme = session.theme;
        let Some(index) = session.last_index else {
            return;
        };
        let position = Duration::try_from_secs_f64(session.last_position_secs).unwrap_or_default();
        self.pending_restore = Some(PendingRestore {
            index,
            position,
            autoplay,
        });
    }

    /// Apply the pending restore when its track exists. Returns the command
    /// resuming playback, if autoplay was requested.
    pub fn apply_pending_restore(&mut self) -> Option<AudioCmd> {
        let restore = self.pending_restore?;
        if restore.index >= self.playlist.len() {
            // Completion-order playlists fill in as probes finish; once none
            // are pending the index is simply stale.
            if self.playlist.pending() == 0 {
                debug!(index = restore.index, "saved track index no longer exists");
                self.pending_restore = None;
            }
            return None;
        }

        self.pending_restore = None;
        self.playlist.select_track(restore.index);
        self.selected = restore.index;
        if restore.autoplay {
            self.play_index(restore.index, restore.position)
        } else {
            None
        }
    }

    /// What to persist at shutdown.
    pub fn session_snapshot(&self) -> SessionState {
        let position = self
            .playback_handle
            .as_ref()
            .and_then(|h| h.lock().ok().map(|info| info.elapsed))
            .unwrap_or_default();
        let index = self.now_playing_index().or(self.playlist.current());

        SessionState {
            last_index: index,
            last_position_secs: if self.now_playing.is_some() {
                position.as_secs_f64()
            } else {
                0.0
            },
            theme: self.theme,
            last_folder: self.current_dir.clone(),
        }
    }
}
