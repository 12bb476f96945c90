//! Silent reporter for repair batches
//!
//! Provides a no-output implementation for testing or when quiet operation is desired.

use std::path::Path;
use std::time::Duration;

use super::{RepairReporter, Reporter};
use crate::batch::BatchSummary;
use crate::strategy::RepairStrategy;

/// Silent implementation for repair operations
#[derive(Default)]
pub struct SilentRepairReporter;

impl SilentRepairReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for SilentRepairReporter {
    fn report_progress(&self, _message: &str, _progress: f64) {}
    fn report_error(&self, _error: &str) {}
}

impl RepairReporter for SilentRepairReporter {
    fn report_repair_start(&self, _reference: &Path, _files_to_repair: usize) {}
    fn report_file_repaired(&self, _file_name: &str, _strategy: RepairStrategy, _output: &Path) {}
    fn report_file_skipped(&self, _file_name: &str, _reason: &str) {}
    fn report_repair_complete(&self, _summary: &BatchSummary) {}
    fn report_elapsed(&self, _elapsed: Duration) {}
}
