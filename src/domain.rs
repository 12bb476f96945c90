//! Core domain types for RIFF chunk handling
//!
//! Offsets into damaged buffers are easy to mix up: a marker offset, the start
//! of a chunk body and the end of a chunk all differ by fixed amounts. These
//! types keep that arithmetic in one place.

/// Size of a RIFF chunk header: 4-byte marker + 4-byte little-endian size
pub const CHUNK_HEADER_LEN: usize = 8;

/// Length of the canonical 44-byte PCM WAV header
pub const CANONICAL_HEADER_LEN: usize = 44;

/// Length of the RIFF header: "RIFF" + size + "WAVE"
pub const RIFF_HEADER_LEN: usize = 12;

pub const RIFF_MAGIC: &[u8; 4] = b"RIFF";
pub const WAVE_FORM: &[u8; 4] = b"WAVE";
pub const FMT_MARKER: &[u8; 4] = b"fmt ";
pub const DATA_MARKER: &[u8; 4] = b"data";

/// A chunk marker found inside a buffer
///
/// `offset` is the position of the 4-byte marker itself; `length` is the
/// declared body length taken from the size field that follows it (0 when the
/// size field is cut off by the end of the buffer). A declared length is not
/// trusted: in a damaged file it may point past the end of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLocation {
    pub offset: usize,
    pub length: usize,
}

impl ChunkLocation {
    pub fn new(offset: usize, length: usize) -> Self {
        ChunkLocation { offset, length }
    }

    /// Offset of the first body byte (just past the size field)
    pub fn body_start(&self) -> usize {
        self.offset + CHUNK_HEADER_LEN
    }

    /// Offset one past the last declared body byte
    pub fn end(&self) -> usize {
        self.body_start().saturating_add(self.length)
    }

    /// Whether the whole declared chunk lies inside a buffer of `buffer_len` bytes
    pub fn fits_within(&self, buffer_len: usize) -> bool {
        self.end() <= buffer_len
    }
}

/// Locations of the two chunks the engine works with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChunkMap {
    pub fmt: Option<ChunkLocation>,
    pub data: Option<ChunkLocation>,
}

impl ChunkMap {
    pub fn is_empty(&self) -> bool {
        self.fmt.is_none() && self.data.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_location_arithmetic() {
        let loc = ChunkLocation::new(12, 16);
        assert_eq!(loc.body_start(), 20);
        assert_eq!(loc.end(), 36);
        assert!(loc.fits_within(36));
        assert!(!loc.fits_within(35));
    }

    #[test]
    fn test_chunk_location_end_saturates() {
        let loc = ChunkLocation::new(4, usize::MAX);
        assert_eq!(loc.end(), usize::MAX);
        assert!(!loc.fits_within(1024));
    }

    #[test]
    fn test_chunk_map_is_empty() {
        assert!(ChunkMap::default().is_empty());
        let map = ChunkMap {
            fmt: None,
            data: Some(ChunkLocation::new(36, 0)),
        };
        assert!(!map.is_empty());
    }
}
