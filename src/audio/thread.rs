use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, info, warn};

use crate::library::MediaSource;

use super::position::{Clock, clamp_position, clamp_volume, seek_target};
use super::sink::create_sink_at;
use super::types::{AudioCmd, AudioError, PlaybackHandle, PlaybackInfo};

const TICK: Duration = Duration::from_millis(200);

pub(super) fn spawn_audio_thread(rx: Receiver<AudioCmd>, playback: PlaybackHandle) -> JoinHandle<()> {
    thread::spawn(move || match Engine::open(playback) {
        Ok(mut engine) => engine.run(rx),
        Err(e) => {
            error!(error = %e, "audio output unavailable, playback disabled");
            // Keep draining so senders never block on a dead channel.
            for cmd in rx {
                if matches!(cmd, AudioCmd::Quit { .. }) {
                    break;
                }
            }
        }
    })
}

/// Owns the output stream and the sink of the loaded source.
struct Engine {
    stream: OutputStream,
    sink: Option<Sink>,
    source: Option<Arc<dyn MediaSource>>,
    total: Option<Duration>,
    clock: Clock,
    volume: f32,
    playback: PlaybackHandle,
}

impl Engine {
    fn open(playback: PlaybackHandle) -> Result<Self, AudioError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| AudioError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would
        // scribble over the TUI.
        stream.log_on_drop(false);

        let volume = playback.lock().map(|info| info.volume).unwrap_or(1.0);
        Ok(Self {
            stream,
            sink: None,
            source: None,
            total: None,
            clock: Clock::default(),
            volume,
            playback,
        })
    }

    fn run(&mut self, rx: Receiver<AudioCmd>) {
        loop {
            match rx.recv_timeout(TICK) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    self.quit(fade_out_ms);
                    break;
                }
                Ok(cmd) => self.handle(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.tick();
        }
        self.unload();
    }

    fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Play { source, start_at } => {
                if let Err(e) = self.play(source, start_at) {
                    warn!(error = %e, "cannot start playback");
                    self.unload();
                    self.publish(|info| info.error = Some(e.to_string()));
                }
            }
            AudioCmd::TogglePause => self.toggle_pause(),
            AudioCmd::Stop => self.unload(),
            AudioCmd::SeekBy(secs) => {
                let target = seek_target(self.clock.elapsed(), secs, self.total);
                self.seek_to(target);
            }
            AudioCmd::SeekTo(at) => self.seek_to(clamp_position(at, self.total)),
            AudioCmd::SetVolume(v) => {
                self.volume = clamp_volume(v);
                if let Some(sink) = &self.sink {
                    sink.set_volume(self.volume);
                }
            }
            AudioCmd::Quit { .. } => {}
        }
        self.publish(|_| {});
    }

    fn play(&mut self, source: Arc<dyn MediaSource>, start_at: Duration) -> Result<(), AudioError> {
        if let Some(old) = self.sink.take() {
            old.stop();
        }

        let (sink, total) = create_sink_at(&self.stream, source.as_ref(), start_at)?;
        sink.set_volume(self.volume);
        sink.play();
        info!(name = source.name(), start_at = ?start_at, "playing");

        self.sink = Some(sink);
        self.source = Some(source);
        self.total = total;
        self.clock.reset(start_at, true);
        self.publish(|info| {
            info.finished = false;
            info.error = None;
        });
        Ok(())
    }

    fn toggle_pause(&mut self) {
        let Some(sink) = &self.sink else {
            return;
        };
        if self.clock.is_running() {
            sink.pause();
            self.clock.pause();
        } else {
            sink.play();
            self.clock.resume();
        }
    }

    /// Rebuild the sink from the start of the source and skip to `at`.
    fn seek_to(&mut self, at: Duration) {
        let Some(source) = self.source.clone() else {
            return;
        };
        let running = self.clock.is_running();
        if let Some(old) = self.sink.take() {
            old.stop();
        }

        match create_sink_at(&self.stream, source.as_ref(), at) {
            Ok((sink, _)) => {
                sink.set_volume(self.volume);
                if running {
                    sink.play();
                }
                self.sink = Some(sink);
                self.clock.reset(at, running);
                debug!(position = ?at, "seeked");
            }
            Err(e) => {
                warn!(error = %e, "seek failed, stopping");
                self.unload();
            }
        }
    }

    fn unload(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.source = None;
        self.total = None;
        self.clock.reset(Duration::ZERO, false);
    }

    /// Detect natural end of playback and refresh the elapsed time.
    fn tick(&mut self) {
        let drained = self
            .sink
            .as_ref()
            .is_some_and(|sink| self.clock.is_running() && sink.empty());
        if drained {
            debug!("source finished");
            self.unload();
            self.publish(|info| info.finished = true);
        } else {
            self.publish(|_| {});
        }
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(sink) = &self.sink {
            if self.clock.is_running() {
                fade_out(sink, self.volume, fade_out_ms);
            }
            sink.stop();
        }
        self.unload();
        self.publish(|_| {});
    }

    fn publish(&self, update: impl FnOnce(&mut PlaybackInfo)) {
        if let Ok(mut info) = self.playback.lock() {
            info.loaded = self.sink.is_some();
            info.playing = self.sink.is_some() && self.clock.is_running();
            info.elapsed = self.clock.elapsed();
            info.total = self.total;
            info.volume = self.volume;
            update(&mut info);
        }
    }
}

fn fade_out(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
