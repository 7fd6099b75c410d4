use std::time::Duration;

use tracing::{debug, warn};

use crate::tags::{CoverImage, HEADER_LEN, TagResult, read_tags, required_len};

use super::source::{MediaSource, SourceError};

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Display metadata for one track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMetadata {
    pub display_name: String,
    pub artist: String,
    pub album: String,
    pub cover: Option<CoverImage>,
    /// `None` until probed (or when probing failed).
    pub duration: Option<Duration>,
}

impl TrackMetadata {
    /// Defaults derived from the file name alone.
    pub fn from_name(name: &str) -> Self {
        Self {
            display_name: strip_extension(name),
            artist: UNKNOWN_ARTIST.to_string(),
            album: UNKNOWN_ALBUM.to_string(),
            cover: None,
            duration: None,
        }
    }

    /// Overlay whatever the tag provided.
    pub fn with_tags(mut self, tags: TagResult) -> Self {
        if let Some(title) = tags.title {
            self.display_name = title;
        }
        if let Some(artist) = tags.artist {
            self.artist = artist;
        }
        if let Some(album) = tags.album {
            self.album = album;
        }
        if tags.cover.is_some() {
            self.cover = tags.cover;
        }
        self
    }
}

/// Drop the last extension: `"01 Intro.mp3"` -> `"01 Intro"`.
/// Names without an extension (or that would end up empty) are kept as-is.
pub fn strip_extension(name: &str) -> String {
    match name.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < name.len() => name[..pos].to_string(),
        _ => name.to_string(),
    }
}

/// Only MPEG audio carries the ID3v2 tags we read; other formats keep
/// file-name metadata.
pub fn supports_id3(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".mp3")
}

fn read_tag_bytes(source: &dyn MediaSource) -> Result<Vec<u8>, SourceError> {
    let head = source.read_head(HEADER_LEN)?;
    match required_len(&head) {
        Some(len) => source.read_head(len),
        None => Ok(head),
    }
}

/// Build the metadata for `source`: tags where supported, then duration.
///
/// Never fails; read errors fall back to file-name metadata.
pub fn describe(source: &dyn MediaSource) -> TrackMetadata {
    let mut metadata = TrackMetadata::from_name(source.name());

    if supports_id3(source.name()) {
        match read_tag_bytes(source) {
            Ok(bytes) => {
                let tags = read_tags(&bytes);
                if tags.is_empty() {
                    debug!(name = source.name(), "no usable id3 tag");
                }
                metadata = metadata.with_tags(tags);
            }
            Err(e) => warn!(error = %e, "tag read failed, using file name"),
        }
    }

    metadata.duration = source.probe_duration();
    metadata
}
