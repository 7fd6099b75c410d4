//! Opening a source and preparing a paused `rodio` sink for it.

use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::library::MediaSource;

use super::types::AudioError;

/// A paused `Sink` positioned at `start_at`, plus the decoder's idea of the
/// total length.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    source: &dyn MediaSource,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), AudioError> {
    let reader = source.open()?;
    let decoder = Decoder::new(reader).map_err(|e| AudioError::Decode {
        name: source.name().to_string(),
        reason: e.to_string(),
    })?;
    let total = decoder.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    sink.append(decoder.skip_duration(start_at));
    sink.pause();
    Ok((sink, total))
}
