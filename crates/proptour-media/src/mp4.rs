//! Minimal MP4/MOV container parsing.
//!
//! Duration probing normally shells out to FFmpeg, but worker sandboxes and
//! CI images do not always carry the binary. For MP4-family containers the
//! global duration lives in the `mvhd` box, which is cheap to parse directly:
//! boxes are `[u32 BE size][4-byte type][payload]`, with a 64-bit extended
//! size form (size == 1) and a size == 0 sentinel meaning "rest of file".
//! `mvhd` nests inside `moov`, so the walk recurses into that container.

use std::path::Path;

/// File extensions the fallback parser understands.
const SUPPORTED_EXTENSIONS: [&str; 3] = ["mp4", "m4v", "mov"];

/// Whether the fallback parser can be applied to this path at all.
pub fn is_supported_container(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.iter().any(|s| *s == e)
        })
        .unwrap_or(false)
}

/// Extract the movie duration in seconds from raw container bytes.
///
/// Returns `None` for anything malformed: truncated boxes, absent `mvhd`,
/// zero timescale. Never panics on arbitrary input.
pub fn mvhd_duration_seconds(data: &[u8]) -> Option<f64> {
    let payload = find_box(data, b"mvhd")?;
    parse_mvhd(payload)
}

/// Walk sibling boxes looking for `target`, recursing into `moov`.
fn find_box<'a>(data: &'a [u8], target: &[u8; 4]) -> Option<&'a [u8]> {
    let total_len = data.len();
    let mut offset: usize = 0;

    while offset + 8 <= total_len {
        let mut size = u32::from_be_bytes(data[offset..offset + 4].try_into().ok()?) as u64;
        let box_type = &data[offset + 4..offset + 8];
        let mut header_size: u64 = 8;

        if size == 1 {
            // Extended 64-bit size follows the type tag.
            if offset + 16 > total_len {
                return None;
            }
            size = u64::from_be_bytes(data[offset + 8..offset + 16].try_into().ok()?);
            header_size = 16;
        }

        if size == 0 {
            // Sentinel: box extends to the end of the file.
            size = (total_len - offset) as u64;
        }

        if size < header_size {
            return None;
        }
        let end = (offset as u64).checked_add(size)?;
        if end > total_len as u64 {
            return None;
        }
        let payload = &data[offset + header_size as usize..end as usize];

        if box_type == target {
            return Some(payload);
        }

        // moov is a pure container; mvhd sits somewhere inside it.
        if box_type == b"moov" {
            if let Some(nested) = find_box(payload, target) {
                return Some(nested);
            }
        }

        offset = end as usize;
    }

    None
}

/// Parse timescale and duration out of an `mvhd` payload.
///
/// Version 1 carries 64-bit duration fields; version 0 is the common 32-bit
/// layout. Field offsets skip version/flags and the creation/modification
/// timestamps that precede the timescale.
fn parse_mvhd(payload: &[u8]) -> Option<f64> {
    let version = *payload.first()?;

    let (timescale, duration) = if version == 1 {
        if payload.len() < 32 {
            return None;
        }
        let timescale = u32::from_be_bytes(payload[20..24].try_into().ok()?) as u64;
        let duration = u64::from_be_bytes(payload[24..32].try_into().ok()?);
        (timescale, duration)
    } else {
        if payload.len() < 20 {
            return None;
        }
        let timescale = u32::from_be_bytes(payload[12..16].try_into().ok()?) as u64;
        let duration = u32::from_be_bytes(payload[16..20].try_into().ok()?) as u64;
        (timescale, duration)
    };

    if timescale == 0 {
        return None;
    }

    Some(duration as f64 / timescale as f64)
}
