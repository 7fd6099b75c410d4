use super::CoverImage;
use super::text::{Encoding, FrameError};

/// Picture type byte for "Cover (front)".
pub(super) const FRONT_COVER: u8 = 0x03;

pub(super) struct Picture {
    pub kind: u8,
    pub image: CoverImage,
}

/// Decode an `APIC` payload, or the v2.2 `PIC` layout when `legacy` is set.
///
/// APIC: `[encoding][mime\0][type][description\0][image...]`
/// PIC:  `[encoding][format; 3][type][description\0][image...]`
pub(super) fn decode_picture(payload: &[u8], legacy: bool) -> Result<Picture, FrameError> {
    let (&marker, rest) = payload
        .split_first()
        .ok_or(FrameError::Malformed("empty picture frame"))?;
    let encoding = Encoding::from_byte(marker)?;

    let (mime_type, rest) = if legacy {
        if rest.len() < 3 {
            return Err(FrameError::Malformed("truncated picture format"));
        }
        let (format, rest) = rest.split_at(3);
        (legacy_mime(format), rest)
    } else {
        // The MIME type is always ISO-8859-1, regardless of the frame encoding.
        let (mime, rest) = Encoding::Latin1
            .split_terminated(rest)
            .ok_or(FrameError::Malformed("unterminated mime type"))?;
        let mime = Encoding::Latin1.decode(mime).trim().to_ascii_lowercase();
        (normalize_mime(mime), rest)
    };

    let (&kind, rest) = rest
        .split_first()
        .ok_or(FrameError::Malformed("missing picture type"))?;
    let (_description, image) = encoding
        .split_terminated(rest)
        .ok_or(FrameError::Malformed("unterminated picture description"))?;

    if image.is_empty() {
        return Err(FrameError::Malformed("empty picture data"));
    }

    Ok(Picture {
        kind,
        image: CoverImage {
            mime_type,
            bytes: image.to_vec(),
        },
    })
}

fn legacy_mime(format: &[u8]) -> String {
    match format.to_ascii_uppercase().as_slice() {
        b"JPG" => "image/jpeg".to_string(),
        b"PNG" => "image/png".to_string(),
        other => format!("image/{}", String::from_utf8_lossy(other).to_ascii_lowercase()),
    }
}

fn normalize_mime(mime: String) -> String {
    match mime.as_str() {
        // An empty MIME type means "image/" with the format left unspecified.
        "" => "image/".to_string(),
        // Bare subtypes and the non-standard "image/jpg" show up in the wild.
        "jpg" | "jpeg" | "image/jpg" => "image/jpeg".to_string(),
        "png" => "image/png".to_string(),
        _ => mime,
    }
}
