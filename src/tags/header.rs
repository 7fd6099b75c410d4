//! ID3v2 tag header: magic, version, flags and the synchsafe tag size.

use tracing::debug;

/// Length of the fixed ID3v2 header.
pub const HEADER_LEN: usize = 10;

const FLAG_UNSYNC: u8 = 0x80;
const FLAG_EXTENDED: u8 = 0x40;
const FLAG_FOOTER: u8 = 0x10;

/// Decode a 4-byte synchsafe integer: 7 significant bits per byte, 28 bits total.
///
/// `[0x00, 0x00, 0x02, 0x01]` is `257`, not the `513` a plain big-endian
/// read would give.
pub fn decode_synchsafe(bytes: [u8; 4]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &b| (acc << 7) | u32::from(b & 0x7f))
}

/// Total number of bytes (header, tag body and optional footer) needed to
/// read the tag announced by `header`, or `None` if `header` does not start
/// a supported ID3v2 tag.
pub fn required_len(header: &[u8]) -> Option<usize> {
    let h = TagHeader::parse(header)?;
    let footer = if h.version == 4 && h.flags & FLAG_FOOTER != 0 {
        HEADER_LEN
    } else {
        0
    };
    Some(HEADER_LEN + h.size + footer)
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TagHeader {
    /// Major version: 2, 3 or 4.
    pub version: u8,
    pub flags: u8,
    /// Tag size excluding the 10-byte header.
    pub size: usize,
}

impl TagHeader {
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < HEADER_LEN || &bytes[0..3] != b"ID3" {
            return None;
        }

        let version = bytes[3];
        if !(2..=4).contains(&version) {
            debug!(version, "unsupported id3v2 major version");
            return None;
        }

        let flags = bytes[5];
        // v2.2 used bit 6 for a compression scheme that was never defined.
        if version == 2 && flags & FLAG_EXTENDED != 0 {
            debug!("compressed id3v2.2 tag, ignoring");
            return None;
        }

        let raw: [u8; 4] = [bytes[6], bytes[7], bytes[8], bytes[9]];
        if raw.iter().any(|b| b & 0x80 != 0) {
            debug!("id3 size field is not synchsafe");
            return None;
        }

        Some(Self {
            version,
            flags,
            size: decode_synchsafe(raw) as usize,
        })
    }

    pub fn unsynchronised(&self) -> bool {
        self.flags & FLAG_UNSYNC != 0
    }

    fn has_extended_header(&self) -> bool {
        self.version >= 3 && self.flags & FLAG_EXTENDED != 0
    }

    /// Offset of the first frame inside `body`, skipping the extended header
    /// when present. `None` when the extended header overruns the body.
    pub fn frames_offset(&self, body: &[u8]) -> Option<usize> {
        if !self.has_extended_header() {
            return Some(0);
        }
        let raw: [u8; 4] = body.get(0..4)?.try_into().ok()?;
        let len = if self.version == 3 {
            // Size excludes the 4 size bytes themselves.
            u32::from_be_bytes(raw) as usize + 4
        } else {
            decode_synchsafe(raw) as usize
        };
        (len <= body.len()).then_some(len)
    }
}
