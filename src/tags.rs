//! Minimal ID3v2 tag reader.
//!
//! `read_tags` turns the leading bytes of an audio file into display
//! metadata (title, artist, album and an optional cover picture). Missing or
//! malformed tags are never an error: the reader returns whatever it managed
//! to decode before the data stopped making sense.

mod frame;
mod header;
mod picture;
mod text;

use std::borrow::Cow;

use tracing::debug;

use frame::{FrameKind, FrameReader};
use header::TagHeader;

pub use header::{HEADER_LEN, required_len};

/// An embedded picture (APIC/PIC frame). Only the MIME type and raw image
/// bytes are kept; decoding is up to whoever renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Metadata decoded from an ID3v2 tag. Fields not found stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagResult {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub cover: Option<CoverImage>,
}

impl TagResult {
    /// True when no field was decoded.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.artist.is_none() && self.album.is_none() && self.cover.is_none()
    }
}

/// Read ID3v2 title/artist/album/cover from `bytes`.
///
/// `bytes` should hold at least the 10-byte header plus the declared tag
/// size (see [`required_len`]). Shorter input is read as far as it goes.
pub fn read_tags(bytes: &[u8]) -> TagResult {
    let mut result = TagResult::default();

    let Some(header) = TagHeader::parse(bytes) else {
        return result;
    };

    let declared_end = HEADER_LEN.saturating_add(header.size);
    if declared_end > bytes.len() {
        debug!(
            declared = header.size,
            available = bytes.len() - HEADER_LEN,
            "id3 tag truncated, reading available bytes only"
        );
    }
    let region = &bytes[HEADER_LEN..declared_end.min(bytes.len())];

    // Tag-wide unsynchronisation only exists up to v2.3; v2.4 marks it per frame.
    let body: Cow<'_, [u8]> = if header.unsynchronised() && header.version < 4 {
        Cow::Owned(text::resync(region))
    } else {
        Cow::Borrowed(region)
    };

    let Some(start) = header.frames_offset(&body) else {
        debug!("id3 extended header does not fit in tag, giving up");
        return result;
    };

    let mut best_picture_type: Option<u8> = None;

    for frame in FrameReader::new(&body[start..], header.version) {
        let kind = frame.kind();
        if kind == FrameKind::Other {
            continue;
        }
        let Some(payload) = frame.payload() else {
            debug!(id = %frame.id_str(), "skipping compressed or encrypted id3 frame");
            continue;
        };

        match kind {
            FrameKind::Title | FrameKind::Artist | FrameKind::Album => {
                let value = match text::decode_text_frame(&payload) {
                    Ok(v) => v,
                    Err(e) => {
                        debug!(id = %frame.id_str(), error = %e, "stopping id3 frame walk");
                        break;
                    }
                };
                let slot = match kind {
                    FrameKind::Title => &mut result.title,
                    FrameKind::Artist => &mut result.artist,
                    _ => &mut result.album,
                };
                if slot.is_none() {
                    *slot = value;
                }
            }
            FrameKind::Picture { legacy } => {
                let picture = match picture::decode_picture(&payload, legacy) {
                    Ok(p) => p,
                    Err(e) => {
                        debug!(id = %frame.id_str(), error = %e, "stopping id3 frame walk");
                        break;
                    }
                };
                let replace = match best_picture_type {
                    None => true,
                    Some(prev) => prev != picture::FRONT_COVER && picture.kind == picture::FRONT_COVER,
                };
                if replace {
                    best_picture_type = Some(picture.kind);
                    result.cover = Some(picture.image);
                }
            }
            FrameKind::Other => {}
        }
    }

    result
}
