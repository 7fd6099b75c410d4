//! Audio sources: where track bytes come from and how they are described.
//!
//! `source` defines the `MediaSource` seam and its file-backed implementation,
//! `scan` enumerates folders, `metadata` turns a source into display metadata
//! (running the ID3 reader where it applies) and `probe` does that work off
//! the UI thread.

mod metadata;
mod probe;
mod scan;
mod source;

pub use metadata::*;
pub use probe::*;
pub use scan::*;
pub use source::*;
