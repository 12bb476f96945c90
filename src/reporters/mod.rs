//! Progress and output reporting for repair batches
//!
//! The batch driver calls a reporter once per finished file, from whichever
//! worker thread finished it. Reporters therefore must be `Send + Sync` and
//! must not assume files complete in listing order.

mod console;
mod silent;

pub use console::ConsoleRepairReporter;
pub use silent::SilentRepairReporter;

use std::path::Path;
use std::time::Duration;

use crate::batch::BatchSummary;
use crate::strategy::RepairStrategy;

/// Base trait for all reporters
pub trait Reporter: Send + Sync {
    /// Report general progress with a message and completion fraction
    fn report_progress(&self, message: &str, progress: f64);

    /// Report an error that stops the operation
    fn report_error(&self, error: &str);
}

/// Trait for reporting per-file repair results
pub trait RepairReporter: Reporter {
    /// Report the start of a batch
    fn report_repair_start(&self, reference: &Path, files_to_repair: usize);

    /// Report that a file was rebuilt and written
    fn report_file_repaired(&self, file_name: &str, strategy: RepairStrategy, output: &Path);

    /// Report that a file was skipped, with the reason
    fn report_file_skipped(&self, file_name: &str, reason: &str);

    /// Report the final batch summary
    fn report_repair_complete(&self, summary: &BatchSummary);

    /// Report wall-clock time for the whole batch, reference load included
    fn report_elapsed(&self, elapsed: Duration);
}
