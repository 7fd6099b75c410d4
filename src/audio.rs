//! Playback driver.
//!
//! A dedicated thread owns the `rodio` output stream and the sink of the
//! loaded source. It is driven by `AudioCmd`s sent through `AudioPlayer` and
//! publishes its state through a shared `PlaybackInfo`.

mod player;
mod position;
mod sink;
mod thread;
mod types;

pub use player::*;
pub use types::*;

#[cfg(test)]
mod tests;
