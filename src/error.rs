//! Error types for WAV repair operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while repairing WAV files
///
/// Errors split into two classes: fatal errors abort the whole batch before
/// (or while) files are processed, per-file errors skip the offending file and
/// let the batch continue. See [`RepairError::is_fatal`].
#[derive(Debug, Error)]
pub enum RepairError {
    /// Reference lacks the RIFF/WAVE signature or a `fmt `/`data` chunk
    #[error("Invalid reference file: {0}")]
    InvalidReferenceFormat(String),

    /// Reference file could not be read
    #[error("Failed to read reference file {file}: {source}")]
    UnreadableReference {
        file: PathBuf,
        source: std::io::Error,
    },

    /// Format block yields a zero frame size
    #[error(
        "Malformed format info: {bits_per_sample} bits per sample x {channels} channels gives a zero frame size"
    )]
    MalformedFormatInfo { bits_per_sample: u16, channels: u16 },

    /// Damaged file could not be read
    #[error("Failed to read {file}: {source}")]
    UnreadableFile {
        file: PathBuf,
        source: std::io::Error,
    },

    /// No strategy could locate a usable payload
    #[error("No recoverable data: {0}")]
    NoRecoverableData(String),

    /// Rebuilt file would not fit the 32-bit RIFF size fields
    #[error("Payload of {payload_len} bytes does not fit a RIFF size field")]
    PayloadTooLarge { payload_len: usize },

    /// Output file could not be written
    #[error("Failed to write {file}: {source}")]
    WriteFailure {
        file: PathBuf,
        source: std::io::Error,
    },

    /// Input folder could not be enumerated
    #[error("Failed to list {folder}: {source}")]
    ListingFailed {
        folder: PathBuf,
        source: std::io::Error,
    },
}

impl RepairError {
    /// Whether this error aborts the whole batch rather than a single file
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RepairError::InvalidReferenceFormat(_)
                | RepairError::UnreadableReference { .. }
                | RepairError::MalformedFormatInfo { .. }
                | RepairError::ListingFailed { .. }
        )
    }
}

/// Type alias for Result with RepairError
pub type Result<T> = std::result::Result<T, RepairError>;
