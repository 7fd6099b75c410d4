//! Text encodings used by ID3v2 frames.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub(super) enum FrameError {
    #[error("unknown text encoding byte {0:#04x}")]
    UnknownEncoding(u8),
    #[error("malformed frame: {0}")]
    Malformed(&'static str),
}

/// Text encoding marker found as the first byte of text and picture frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Encoding {
    Latin1,
    Utf16,
    Utf16Be,
    Utf8,
}

impl Encoding {
    pub fn from_byte(b: u8) -> Result<Self, FrameError> {
        match b {
            0 => Ok(Self::Latin1),
            1 => Ok(Self::Utf16),
            2 => Ok(Self::Utf16Be),
            3 => Ok(Self::Utf8),
            other => Err(FrameError::UnknownEncoding(other)),
        }
    }

    fn is_wide(self) -> bool {
        matches!(self, Self::Utf16 | Self::Utf16Be)
    }

    /// Split `data` at the first terminator of this encoding. Returns the text
    /// before it and the bytes after it, or `None` if there is no terminator.
    pub fn split_terminated(self, data: &[u8]) -> Option<(&[u8], &[u8])> {
        if self.is_wide() {
            let pos = data
                .chunks_exact(2)
                .position(|pair| pair == [0, 0])
                .map(|i| i * 2)?;
            Some((&data[..pos], &data[pos + 2..]))
        } else {
            let pos = data.iter().position(|&b| b == 0)?;
            Some((&data[..pos], &data[pos + 1..]))
        }
    }

    pub fn decode(self, data: &[u8]) -> String {
        match self {
            Self::Latin1 => data.iter().map(|&b| char::from(b)).collect(),
            Self::Utf8 => String::from_utf8_lossy(data).into_owned(),
            Self::Utf16Be => decode_utf16(data, false),
            Self::Utf16 => match data {
                [0xff, 0xfe, rest @ ..] => decode_utf16(rest, true),
                [0xfe, 0xff, rest @ ..] => decode_utf16(rest, false),
                // No BOM: fall back to big-endian, the Unicode default.
                _ => decode_utf16(data, false),
            },
        }
    }
}

fn decode_utf16(data: &[u8], little_endian: bool) -> String {
    let units = data.chunks_exact(2).map(|pair| {
        if little_endian {
            u16::from_le_bytes([pair[0], pair[1]])
        } else {
            u16::from_be_bytes([pair[0], pair[1]])
        }
    });
    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Decode a text frame payload (`[encoding][text...]`).
///
/// Only the first value of a multi-value (v2.4) frame is kept. `Ok(None)`
/// means the frame decoded to nothing useful.
pub(super) fn decode_text_frame(payload: &[u8]) -> Result<Option<String>, FrameError> {
    let (&marker, text) = payload
        .split_first()
        .ok_or(FrameError::Malformed("empty text frame"))?;
    let encoding = Encoding::from_byte(marker)?;

    let decoded = encoding.decode(text);
    let first = decoded.split('\0').next().unwrap_or_default();

    // Surrounding whitespace is part of the value; a blank value is absent.
    if first.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(first.to_string()))
    }
}

/// Undo ID3 unsynchronisation: every `0xFF 0x00` pair becomes `0xFF`.
pub(super) fn resync(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut prev_ff = false;
    for &b in data {
        if prev_ff && b == 0x00 {
            prev_ff = false;
            continue;
        }
        out.push(b);
        prev_ff = b == 0xff;
    }
    out
}
