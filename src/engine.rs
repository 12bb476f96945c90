//! Single-file repair entry point
//!
//! `repair_one` is a pure function of the reference, the damaged bytes and
//! the configuration: it performs no I/O, so callers are free to run it on any
//! thread.

use log::debug;

use crate::config::RepairConfig;
use crate::domain::ChunkMap;
use crate::error::Result;
use crate::extract::extract;
use crate::reassemble::{reassemble, RepairedFile};
use crate::reference::ReferenceMetadata;
use crate::scanner::scan_chunks;
use crate::strategy::{select, RepairStrategy};

/// Raw bytes of one damaged file with its detected chunk markers
#[derive(Debug, Clone)]
pub struct DamagedFile {
    bytes: Vec<u8>,
    chunks: ChunkMap,
    name: String,
}

impl DamagedFile {
    pub fn new(bytes: Vec<u8>, name: impl Into<String>) -> Self {
        let chunks = scan_chunks(&bytes);
        DamagedFile {
            bytes,
            chunks,
            name: name.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn chunks(&self) -> &ChunkMap {
        &self.chunks
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Result of a successful repair
#[derive(Debug, Clone)]
pub struct RepairOutcome {
    pub strategy: RepairStrategy,
    pub file: RepairedFile,
}

/// Repair one damaged buffer against the reference
pub fn repair_one(
    reference: &ReferenceMetadata,
    damaged_bytes: Vec<u8>,
    file_name_hint: &str,
    config: &RepairConfig,
) -> Result<RepairOutcome> {
    let damaged = DamagedFile::new(damaged_bytes, file_name_hint);
    debug!(
        "{}: {} bytes, fmt {:?}, data {:?}",
        damaged.name(),
        damaged.as_bytes().len(),
        damaged.chunks().fmt,
        damaged.chunks().data
    );

    let strategy = select(damaged.name(), damaged.as_bytes(), damaged.chunks(), config);
    debug!("{}: selected {strategy}", damaged.name());

    let extraction = extract(strategy, reference, &damaged, config)?;
    let file = reassemble(
        reference.header_prefix(),
        extraction.fmt_chunk,
        reference.inter_chunk(),
        extraction.payload,
    )?;

    debug_assert_eq!(file.check_structure(), Ok(()));
    Ok(RepairOutcome { strategy, file })
}
