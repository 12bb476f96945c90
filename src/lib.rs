//! Repair damaged WAV files by splicing their audio with the header of a
//! known-good reference recording.
//!
//! The engine (`scanner`, `reference`, `strategy`, `extract`, `reassemble`,
//! `engine`) works purely on byte buffers. `file_ops`, `batch` and
//! `reporters` wrap it for folder-at-a-time use.

pub mod args;
pub mod batch;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod extract;
pub mod file_ops;
pub mod format;
pub mod reassemble;
pub mod reference;
pub mod reporters;
pub mod scanner;
pub mod strategy;

pub use args::parse_args;
pub use batch::{repair_batch, repair_folder, BatchSummary, CancelToken, FileResult};
pub use config::RepairConfig;
pub use engine::{repair_one, DamagedFile, RepairOutcome};
pub use error::{RepairError, Result};
pub use reassemble::RepairedFile;
pub use reference::ReferenceMetadata;
pub use strategy::RepairStrategy;
