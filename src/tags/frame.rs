//! Walking the frames of an ID3v2 tag body.

use std::borrow::Cow;

use tracing::debug;

use super::header::decode_synchsafe;
use super::text::resync;

// v2.3 frame format flags (second flag byte).
const V3_COMPRESSED: u8 = 0x80;
const V3_ENCRYPTED: u8 = 0x40;
const V3_GROUPED: u8 = 0x20;

// v2.4 frame format flags (second flag byte).
const V4_GROUPED: u8 = 0x40;
const V4_COMPRESSED: u8 = 0x08;
const V4_ENCRYPTED: u8 = 0x04;
const V4_UNSYNC: u8 = 0x02;
const V4_DATA_LENGTH: u8 = 0x01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FrameKind {
    Title,
    Artist,
    Album,
    /// `legacy` is set for the v2.2 `PIC` layout.
    Picture { legacy: bool },
    Other,
}

pub(super) struct Frame<'a> {
    id: &'a [u8],
    version: u8,
    format_flags: u8,
    data: &'a [u8],
}

impl<'a> Frame<'a> {
    pub fn id_str(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.id)
    }

    pub fn kind(&self) -> FrameKind {
        match self.id {
            b"TIT2" | b"TT2" => FrameKind::Title,
            b"TPE1" | b"TP1" => FrameKind::Artist,
            b"TALB" | b"TAL" => FrameKind::Album,
            b"APIC" => FrameKind::Picture { legacy: false },
            b"PIC" => FrameKind::Picture { legacy: true },
            _ => FrameKind::Other,
        }
    }

    /// Frame content with per-frame extras stripped, or `None` for frames we
    /// cannot read (compressed or encrypted).
    pub fn payload(&self) -> Option<Cow<'a, [u8]>> {
        match self.version {
            3 => {
                if self.format_flags & (V3_COMPRESSED | V3_ENCRYPTED) != 0 {
                    return None;
                }
                let skip = usize::from(self.format_flags & V3_GROUPED != 0);
                self.data.get(skip..).map(Cow::Borrowed)
            }
            4 => {
                if self.format_flags & (V4_COMPRESSED | V4_ENCRYPTED) != 0 {
                    return None;
                }
                let mut skip = 0;
                if self.format_flags & V4_GROUPED != 0 {
                    skip += 1;
                }
                if self.format_flags & V4_DATA_LENGTH != 0 {
                    skip += 4;
                }
                let data = self.data.get(skip..)?;
                if self.format_flags & V4_UNSYNC != 0 {
                    Some(Cow::Owned(resync(data)))
                } else {
                    Some(Cow::Borrowed(data))
                }
            }
            _ => Some(Cow::Borrowed(self.data)),
        }
    }
}

/// Iterates frames until the data runs out, padding starts, or a frame
/// header stops making sense.
pub(super) struct FrameReader<'a> {
    data: &'a [u8],
    pos: usize,
    version: u8,
}

impl<'a> FrameReader<'a> {
    pub fn new(data: &'a [u8], version: u8) -> Self {
        Self {
            data,
            pos: 0,
            version,
        }
    }

    fn id_len(&self) -> usize {
        if self.version == 2 { 3 } else { 4 }
    }

    fn size_len(&self) -> usize {
        if self.version == 2 { 3 } else { 4 }
    }

    fn header_len(&self) -> usize {
        if self.version == 2 { 6 } else { 10 }
    }

    fn frame_size(&self, raw: &[u8]) -> usize {
        match self.version {
            2 => (usize::from(raw[0]) << 16) | (usize::from(raw[1]) << 8) | usize::from(raw[2]),
            3 => u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize,
            _ => decode_synchsafe([raw[0], raw[1], raw[2], raw[3]]) as usize,
        }
    }
}

impl<'a> Iterator for FrameReader<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Frame<'a>> {
        let rest = &self.data[self.pos..];
        let header_len = self.header_len();
        let id_len = self.id_len();

        if rest.len() < header_len {
            return None;
        }

        let id = &rest[..id_len];
        if id.iter().all(|&b| b == 0) {
            // Padding.
            return None;
        }
        if !id
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            debug!(offset = self.pos, "invalid id3 frame id, stopping");
            return None;
        }

        let size = self.frame_size(&rest[id_len..id_len + self.size_len()]);
        if size == 0 {
            debug!(id = %String::from_utf8_lossy(id), "zero-sized id3 frame, stopping");
            return None;
        }
        if size > rest.len() - header_len {
            debug!(
                id = %String::from_utf8_lossy(id),
                size,
                remaining = rest.len() - header_len,
                "id3 frame overruns tag, stopping"
            );
            return None;
        }

        let format_flags = if self.version == 2 { 0 } else { rest[9] };
        let data = &rest[header_len..header_len + size];
        self.pos += header_len + size;

        Some(Frame {
            id,
            version: self.version,
            format_flags,
            data,
        })
    }
}
