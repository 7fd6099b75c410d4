//! Application module: the explicit context the UI renders and the event
//! loop mutates.
//!
//! The `App` model lives in `app::model`; `app::transport` holds the actions
//! that translate key presses into audio-thread commands.

mod model;
mod transport;

pub use model::*;

#[cfg(test)]
mod tests;
