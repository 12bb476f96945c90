//! Marker scanning over raw, possibly damaged, byte buffers
//!
//! Scans are plain forward searches from offset 0 and the first match wins.
//! Nothing here assumes the buffer is a well-formed RIFF file: an empty or
//! truncated buffer simply yields no match.

use crate::domain::{
    ChunkLocation, ChunkMap, CANONICAL_HEADER_LEN, DATA_MARKER, FMT_MARKER, RIFF_MAGIC, WAVE_FORM,
};

/// Find the first occurrence of a 4-byte chunk marker
pub fn find_marker(buffer: &[u8], marker: &[u8; 4]) -> Option<ChunkLocation> {
    let offset = buffer
        .windows(marker.len())
        .position(|window| window == marker)?;
    Some(ChunkLocation::new(offset, read_declared_size(buffer, offset)))
}

/// Read the little-endian size field following a marker, 0 if truncated
fn read_declared_size(buffer: &[u8], marker_offset: usize) -> usize {
    let start = marker_offset + 4;
    buffer
        .get(start..start + 4)
        .map(|bytes| u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize)
        .unwrap_or(0)
}

/// Locate both the `fmt ` and `data` markers
pub fn scan_chunks(buffer: &[u8]) -> ChunkMap {
    ChunkMap {
        fmt: find_marker(buffer, FMT_MARKER),
        data: find_marker(buffer, DATA_MARKER),
    }
}

/// Check for "RIFF" at offset 0 and "WAVE" at offset 8
///
/// Only the canonical header region is considered, so a buffer shorter than
/// 12 bytes never has a signature.
pub fn has_riff_signature(buffer: &[u8]) -> bool {
    let header = &buffer[..buffer.len().min(CANONICAL_HEADER_LEN)];
    header.len() >= 12 && &header[0..4] == RIFF_MAGIC && &header[8..12] == WAVE_FORM
}
