//! Playlist: ordered tracks, the current-track cursor and the
//! shuffle/repeat policies that decide what plays next.
//!
//! The `Playlist` is owned by a single thread. Observers get change
//! notifications through `Playlist::subscribe`.

mod events;
mod manager;
mod model;
mod navigation;
mod refs;

pub use events::PlaylistEvent;
pub use manager::*;
pub use model::*;
pub use refs::*;
