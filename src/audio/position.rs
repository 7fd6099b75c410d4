//! Elapsed-time bookkeeping and the arithmetic behind seeking and volume.

use std::time::{Duration, Instant};

/// Wall-clock position of the loaded source: time accumulated before the
/// last pause plus time since the last resume.
#[derive(Debug, Clone, Default)]
pub(crate) struct Clock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Clock {
    /// Reset to `at`, running or paused.
    pub fn reset(&mut self, at: Duration, running: bool) {
        self.accumulated = at;
        self.started_at = running.then(Instant::now);
    }

    pub fn pause(&mut self) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
    }

    pub fn resume(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }
}

/// Position after moving `delta_secs` from `elapsed`, kept within
/// `0..=total` when the total is known.
pub(crate) fn seek_target(elapsed: Duration, delta_secs: i64, total: Option<Duration>) -> Duration {
    let delta = Duration::from_secs(delta_secs.unsigned_abs());
    let target = if delta_secs < 0 {
        elapsed.saturating_sub(delta)
    } else {
        elapsed.saturating_add(delta)
    };
    clamp_position(target, total)
}

pub(crate) fn clamp_position(at: Duration, total: Option<Duration>) -> Duration {
    match total {
        Some(total) => at.min(total),
        None => at,
    }
}

/// Keep a volume within `0.0..=1.0`; NaN counts as silence.
pub(crate) fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}
