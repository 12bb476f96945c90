//! Payload extraction
//!
//! Given a strategy, work out which bytes of the damaged buffer are audio
//! worth keeping and which `fmt ` chunk should describe them. Everything is
//! borrowed: the reassembler copies once into the output buffer.

use log::{debug, warn};

use crate::config::RepairConfig;
use crate::domain::{ChunkLocation, CANONICAL_HEADER_LEN};
use crate::engine::DamagedFile;
use crate::error::{RepairError, Result};
use crate::format::{AudioFormatInfo, FORMAT_BLOCK_LEN};
use crate::reference::ReferenceMetadata;
use crate::strategy::RepairStrategy;

/// Salvaged pieces of one damaged file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extraction<'a> {
    /// Audio bytes to place after the rebuilt `data` header
    pub payload: &'a [u8],
    /// Complete `fmt ` chunk (marker, size, body) for the output
    pub fmt_chunk: &'a [u8],
    /// Where `payload` starts inside the damaged buffer
    pub payload_offset: usize,
}

/// Offset of the first whole frame after a corrupted prefix
///
/// The prefix length is generally not frame-aligned, so the offset is rounded
/// up to the next frame boundary measured from the end of the canonical
/// 44-byte header.
pub fn first_complete_frame_offset(format: &AudioFormatInfo, corrupted_prefix_bytes: usize) -> usize {
    let frame_size = format.frame_size().max(1);
    let scrambled = corrupted_prefix_bytes.saturating_sub(CANONICAL_HEADER_LEN);
    CANONICAL_HEADER_LEN + scrambled.div_ceil(frame_size) * frame_size
}

/// Locate payload and fmt chunk for the chosen strategy
pub fn extract<'a>(
    strategy: RepairStrategy,
    reference: &'a ReferenceMetadata,
    damaged: &'a DamagedFile,
    config: &RepairConfig,
) -> Result<Extraction<'a>> {
    let extraction = match strategy {
        RepairStrategy::ZeroHeaderClip => zero_header_clip(reference, damaged)?,
        RepairStrategy::FixedWindowStrip => fixed_window_strip(reference, damaged, config)?,
        RepairStrategy::MarkerSplice => marker_splice(reference, damaged, config)?,
    };

    if extraction.payload.is_empty() {
        return Err(RepairError::NoRecoverableData(format!(
            "{strategy} leaves no payload after offset {}",
            extraction.payload_offset
        )));
    }

    debug!(
        "{}: {strategy} payload {} bytes at offset {}",
        damaged.name(),
        extraction.payload.len(),
        extraction.payload_offset
    );
    Ok(extraction)
}

fn zero_header_clip<'a>(
    reference: &'a ReferenceMetadata,
    damaged: &'a DamagedFile,
) -> Result<Extraction<'a>> {
    let bytes = damaged.as_bytes();
    let start = reference.header_len();
    if bytes.len() <= start {
        return Err(RepairError::NoRecoverableData(format!(
            "file is {} bytes, no audio after the {start}-byte header",
            bytes.len()
        )));
    }
    Ok(Extraction {
        payload: &bytes[start..],
        fmt_chunk: reference.fmt_chunk(),
        payload_offset: start,
    })
}

fn fixed_window_strip<'a>(
    reference: &'a ReferenceMetadata,
    damaged: &'a DamagedFile,
    config: &RepairConfig,
) -> Result<Extraction<'a>> {
    let bytes = damaged.as_bytes();
    let start = first_complete_frame_offset(reference.format(), config.corrupted_prefix_bytes);
    let end = bytes
        .len()
        .checked_sub(config.corrupted_trailer_bytes)
        .ok_or_else(|| {
            RepairError::NoRecoverableData(format!(
                "file is {} bytes, shorter than the {}-byte corrupted trailer",
                bytes.len(),
                config.corrupted_trailer_bytes
            ))
        })?;
    if start >= end {
        return Err(RepairError::NoRecoverableData(format!(
            "first whole frame at {start} lies past the usable end at {end}"
        )));
    }
    Ok(Extraction {
        payload: &bytes[start..end],
        fmt_chunk: reference.fmt_chunk(),
        payload_offset: start,
    })
}

fn marker_splice<'a>(
    reference: &'a ReferenceMetadata,
    damaged: &'a DamagedFile,
    config: &RepairConfig,
) -> Result<Extraction<'a>> {
    let bytes = damaged.as_bytes();
    let chunks = damaged.chunks();

    let fmt_chunk = match chunks.fmt {
        Some(fmt) if usable_fmt_chunk(&fmt, bytes.len()) => &bytes[fmt.offset..fmt.end()],
        Some(fmt) => {
            warn!(
                "{}: 'fmt ' chunk at {} declares {} bytes, using the reference's",
                damaged.name(),
                fmt.offset,
                fmt.length
            );
            reference.fmt_chunk()
        }
        None => reference.fmt_chunk(),
    };

    let start = match chunks.data {
        Some(data) => data.body_start(),
        None if config.raw_truncation => {
            debug!(
                "{}: no 'data' marker, cutting at the reference's data offset",
                damaged.name()
            );
            reference.header_len()
        }
        None => {
            return Err(RepairError::NoRecoverableData(
                "no 'data' marker in the damaged file".to_string(),
            ))
        }
    };

    let payload = bytes.get(start..).unwrap_or(&[]);
    Ok(Extraction {
        payload,
        fmt_chunk,
        payload_offset: start,
    })
}

/// A damaged `fmt ` chunk is only reused when its declared body is complete
fn usable_fmt_chunk(fmt: &ChunkLocation, buffer_len: usize) -> bool {
    fmt.length >= FORMAT_BLOCK_LEN && fmt.fits_within(buffer_len)
}
