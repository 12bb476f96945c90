//! Console reporter for repair batches

use std::path::Path;
use std::time::Duration;

use super::{RepairReporter, Reporter};
use crate::batch::BatchSummary;
use crate::strategy::RepairStrategy;

/// Console implementation for repair operations
#[derive(Default)]
pub struct ConsoleRepairReporter;

impl ConsoleRepairReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for ConsoleRepairReporter {
    fn report_progress(&self, message: &str, progress: f64) {
        println!("{} ({:.1}%)", message, progress * 100.0);
    }

    fn report_error(&self, error: &str) {
        eprintln!("Error: {}", error);
    }
}

impl RepairReporter for ConsoleRepairReporter {
    fn report_repair_start(&self, reference: &Path, files_to_repair: usize) {
        println!("Reference: \"{}\"", reference.display());
        println!("Found {} candidate files to repair", files_to_repair);
    }

    fn report_file_repaired(&self, file_name: &str, strategy: RepairStrategy, output: &Path) {
        println!(
            "Target: \"{}\" - repaired ({}), saved to \"{}\".",
            file_name,
            strategy,
            output.display()
        );
    }

    fn report_file_skipped(&self, file_name: &str, reason: &str) {
        println!("Target: \"{}\" - skipped: {}", file_name, reason);
    }

    fn report_repair_complete(&self, summary: &BatchSummary) {
        print!("{}", summary);
    }

    fn report_elapsed(&self, elapsed: Duration) {
        println!("Execution time: {:.2} seconds", elapsed.as_secs_f64());
    }
}
