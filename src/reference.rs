//! Reference file metadata
//!
//! A known-good WAV recorded with the same settings as the damaged files
//! supplies the `fmt ` chunk and the header layout for every repair in a
//! batch. It is parsed once and only ever read afterwards, so one instance can
//! be shared by all worker threads.

use log::debug;
use std::fs;
use std::path::Path;

use crate::domain::{ChunkLocation, RIFF_HEADER_LEN};
use crate::error::{RepairError, Result};
use crate::format::AudioFormatInfo;
use crate::scanner::{has_riff_signature, scan_chunks};

/// Parsed layout of the reference file
#[derive(Debug, Clone)]
pub struct ReferenceMetadata {
    bytes: Vec<u8>,
    format: AudioFormatInfo,
    fmt: ChunkLocation,
    data: ChunkLocation,
}

impl ReferenceMetadata {
    /// Read and parse a reference file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| RepairError::UnreadableReference {
            file: path.to_path_buf(),
            source,
        })?;
        debug!("read {} reference bytes from {}", bytes.len(), path.display());
        Self::load(bytes)
    }

    /// Parse reference bytes
    ///
    /// Fails with `InvalidReferenceFormat` when the signature or either marker
    /// is missing, and with `MalformedFormatInfo` when the format block gives
    /// a zero frame size.
    pub fn load(bytes: Vec<u8>) -> Result<Self> {
        if !has_riff_signature(&bytes) {
            return Err(RepairError::InvalidReferenceFormat(
                "missing RIFF/WAVE signature".to_string(),
            ));
        }

        let chunks = scan_chunks(&bytes);
        let fmt = chunks.fmt.ok_or_else(|| {
            RepairError::InvalidReferenceFormat("no 'fmt ' chunk marker".to_string())
        })?;
        let data = chunks.data.ok_or_else(|| {
            RepairError::InvalidReferenceFormat("no 'data' chunk marker".to_string())
        })?;

        if fmt.offset < RIFF_HEADER_LEN {
            return Err(RepairError::InvalidReferenceFormat(format!(
                "'fmt ' marker at offset {} overlaps the RIFF header",
                fmt.offset
            )));
        }
        if !fmt.fits_within(bytes.len()) {
            return Err(RepairError::InvalidReferenceFormat(format!(
                "'fmt ' chunk declares {} bytes but the file ends at {}",
                fmt.length,
                bytes.len()
            )));
        }
        if data.offset < fmt.end() {
            return Err(RepairError::InvalidReferenceFormat(format!(
                "'data' marker at offset {} lies inside the 'fmt ' chunk ending at {}",
                data.offset,
                fmt.end()
            )));
        }

        let format = AudioFormatInfo::parse(&bytes[fmt.body_start()..fmt.end()])?;
        format.validate()?;

        debug!(
            "reference: fmt at {}, data at {}, {} ch, {} Hz, {} bits",
            fmt.offset, data.offset, format.channels, format.sample_rate, format.bits_per_sample
        );

        Ok(ReferenceMetadata {
            bytes,
            format,
            fmt,
            data,
        })
    }

    pub fn format(&self) -> &AudioFormatInfo {
        &self.format
    }

    pub fn fmt_location(&self) -> ChunkLocation {
        self.fmt
    }

    pub fn data_location(&self) -> ChunkLocation {
        self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Everything before the `fmt ` marker, starting with the RIFF header
    pub fn header_prefix(&self) -> &[u8] {
        &self.bytes[..self.fmt.offset]
    }

    /// The complete `fmt ` chunk: marker, size field and body
    pub fn fmt_chunk(&self) -> &[u8] {
        &self.bytes[self.fmt.offset..self.fmt.end()]
    }

    /// Bytes between the end of the `fmt ` chunk and the `data` marker
    pub fn inter_chunk(&self) -> &[u8] {
        &self.bytes[self.fmt.end()..self.data.offset]
    }

    /// Offset of the first payload byte; 44 for a canonical header
    pub fn header_len(&self) -> usize {
        self.data.body_start()
    }

    /// The full header up to and including the `data` size field
    pub fn header(&self) -> &[u8] {
        let end = self.header_len().min(self.bytes.len());
        &self.bytes[..end]
    }
}
