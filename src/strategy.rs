//! Repair strategy selection
//!
//! Each damaged file is repaired by exactly one of three strategies. The more
//! specific offset-based strategy wins when the file name or a missing
//! signature points at the fixed-window corruption; otherwise marker evidence
//! decides.

use std::fmt;

use crate::config::RepairConfig;
use crate::domain::{ChunkMap, CANONICAL_HEADER_LEN};
use crate::scanner::has_riff_signature;

/// How a damaged file gets rebuilt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepairStrategy {
    /// Header zeroed or missing; payload starts where the reference's does
    ZeroHeaderClip,
    /// Strip a fixed corrupted prefix (rounded up to a frame boundary) and trailer
    FixedWindowStrip,
    /// Reuse whichever markers survived, borrowing the rest from the reference
    MarkerSplice,
}

impl fmt::Display for RepairStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RepairStrategy::ZeroHeaderClip => "zero-header clip",
            RepairStrategy::FixedWindowStrip => "fixed-window strip",
            RepairStrategy::MarkerSplice => "marker splice",
        };
        f.write_str(name)
    }
}

/// Choose the strategy for one damaged file
///
/// A zeroed header is never taken as evidence of fixed-window damage, however
/// long the file is.
pub fn select(
    file_name: &str,
    buffer: &[u8],
    chunks: &ChunkMap,
    config: &RepairConfig,
) -> RepairStrategy {
    let unsigned_and_long = !has_riff_signature(buffer)
        && !has_zeroed_header(buffer)
        && buffer.len() > config.strip_min_len;

    if is_double_extension_wav(file_name) || unsigned_and_long {
        RepairStrategy::FixedWindowStrip
    } else if chunks.is_empty() {
        RepairStrategy::ZeroHeaderClip
    } else {
        RepairStrategy::MarkerSplice
    }
}

/// Whether the canonical header region is present and entirely zero
pub fn has_zeroed_header(buffer: &[u8]) -> bool {
    buffer.len() >= CANONICAL_HEADER_LEN && buffer[..CANONICAL_HEADER_LEN].iter().all(|&b| b == 0)
}

/// Whether `name` looks like `something.wav.<ext>`
pub fn is_double_extension_wav(file_name: &str) -> bool {
    let Some((stem, ext)) = file_name.rsplit_once('.') else {
        return false;
    };
    if ext.is_empty() {
        return false;
    }
    match stem.rsplit_once('.') {
        Some((base, second)) => !base.is_empty() && second.eq_ignore_ascii_case("wav"),
        None => false,
    }
}
