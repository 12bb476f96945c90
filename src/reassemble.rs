//! Output reassembly
//!
//! Builds the repaired container in one pass and then patches the RIFF size
//! field, so the total length never has to be known up front.

use crate::domain::{
    CHUNK_HEADER_LEN, DATA_MARKER, FMT_MARKER, RIFF_HEADER_LEN, RIFF_MAGIC, WAVE_FORM,
};
use crate::error::{RepairError, Result};

/// Offset of the RIFF chunk size field
const RIFF_SIZE_OFFSET: usize = 4;

/// A rebuilt WAV file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairedFile {
    bytes: Vec<u8>,
    data_size_offset: usize,
}

impl RepairedFile {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Offset of the `data` chunk's size field
    pub fn data_size_offset(&self) -> usize {
        self.data_size_offset
    }

    /// Number of audio bytes after the `data` header
    pub fn payload_len(&self) -> usize {
        self.bytes.len() - (self.data_size_offset + 4)
    }

    /// Verify signature and both size fields
    ///
    /// Returns a description of the first violated invariant.
    pub fn check_structure(&self) -> std::result::Result<(), String> {
        let bytes = &self.bytes;
        if bytes.len() < RIFF_HEADER_LEN {
            return Err(format!("only {} bytes", bytes.len()));
        }
        if &bytes[0..4] != RIFF_MAGIC {
            return Err("missing RIFF magic".to_string());
        }
        if &bytes[8..12] != WAVE_FORM {
            return Err("missing WAVE form type".to_string());
        }
        let riff_size = read_u32_le(bytes, RIFF_SIZE_OFFSET);
        if riff_size as usize != bytes.len() - 8 {
            return Err(format!(
                "RIFF size {} but file length is {}",
                riff_size,
                bytes.len()
            ));
        }
        let marker_offset = self.data_size_offset - 4;
        if &bytes[marker_offset..self.data_size_offset] != DATA_MARKER {
            return Err(format!("no 'data' marker at {marker_offset}"));
        }
        let data_size = read_u32_le(bytes, self.data_size_offset);
        if data_size as usize != self.payload_len() {
            return Err(format!(
                "data size {} but payload is {} bytes",
                data_size,
                self.payload_len()
            ));
        }
        Ok(())
    }
}

fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Build a WAV file from its parts and fix up the size fields
///
/// `header_prefix` must start with the 12-byte RIFF header; anything after it
/// (chunks preceding `fmt ` in the reference) is copied through untouched, as
/// is `inter_chunk`.
pub fn reassemble(
    header_prefix: &[u8],
    fmt_chunk: &[u8],
    inter_chunk: &[u8],
    payload: &[u8],
) -> Result<RepairedFile> {
    debug_assert!(header_prefix.len() >= RIFF_HEADER_LEN);
    debug_assert!(fmt_chunk.starts_with(FMT_MARKER));

    let payload_size = u32::try_from(payload.len()).map_err(|_| RepairError::PayloadTooLarge {
        payload_len: payload.len(),
    })?;

    let total_len = header_prefix.len()
        + fmt_chunk.len()
        + inter_chunk.len()
        + CHUNK_HEADER_LEN
        + payload.len();
    let riff_size = u32::try_from(total_len - 8).map_err(|_| RepairError::PayloadTooLarge {
        payload_len: payload.len(),
    })?;

    let mut bytes = Vec::with_capacity(total_len);
    bytes.extend_from_slice(header_prefix);
    bytes.extend_from_slice(fmt_chunk);
    bytes.extend_from_slice(inter_chunk);
    bytes.extend_from_slice(DATA_MARKER);
    let data_size_offset = bytes.len();
    bytes.extend_from_slice(&payload_size.to_le_bytes());
    bytes.extend_from_slice(payload);

    bytes[RIFF_SIZE_OFFSET..RIFF_SIZE_OFFSET + 4].copy_from_slice(&riff_size.to_le_bytes());

    Ok(RepairedFile {
        bytes,
        data_size_offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &[u8] = b"RIFF\xEE\xEE\xEE\xEEWAVE";
    const FMT: &[u8] = b"fmt \x10\x00\x00\x00\x01\x00\x01\x00\x44\xAC\x00\x00\x88\x58\x01\x00\x02\x00\x10\x00";

    #[test]
    fn test_reassemble_canonical() {
        let payload = vec![0x11u8; 1000];
        let file = reassemble(PREFIX, FMT, &[], &payload).unwrap();

        assert_eq!(file.len(), 1044);
        assert_eq!(file.data_size_offset(), 40);
        assert_eq!(file.payload_len(), 1000);
        assert_eq!(&file.as_bytes()[4..8], &1036u32.to_le_bytes());
        assert_eq!(&file.as_bytes()[40..44], &1000u32.to_le_bytes());
        assert_eq!(file.check_structure(), Ok(()));
    }

    #[test]
    fn test_reassemble_passes_extra_chunks_through() {
        let list = b"LIST\x04\x00\x00\x00INFO";
        let file = reassemble(PREFIX, FMT, list, b"abcd").unwrap();

        assert_eq!(&file.as_bytes()[36..48], list);
        assert_eq!(&file.as_bytes()[48..52], b"data");
        assert_eq!(file.payload_len(), 4);
        assert_eq!(file.check_structure(), Ok(()));
    }

    #[test]
    fn test_check_structure_detects_bad_sizes() {
        let file = reassemble(PREFIX, FMT, &[], b"abcd").unwrap();
        let mut bytes = file.clone().into_bytes();
        bytes.push(0);
        let broken = RepairedFile {
            bytes,
            data_size_offset: file.data_size_offset(),
        };
        assert!(broken.check_structure().is_err());
    }
}
