//! Batch driver
//!
//! Runs the per-file pipeline READ → SELECT → EXTRACT → REASSEMBLE → WRITE
//! over a folder of damaged files on a rayon pool. Per-file failures are
//! recorded and reported; only reference and listing failures abort a batch.

use log::{info, warn};
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::RepairConfig;
use crate::engine::repair_one;
use crate::error::Result;
use crate::file_ops::{
    is_same_file, list_candidate_files, plan_output_paths, read_damaged, write_atomic,
};
use crate::reference::ReferenceMetadata;
use crate::reporters::RepairReporter;
use crate::strategy::RepairStrategy;

/// Batch-level cancellation flag
///
/// Cancelling stops new files from being dispatched; files already being
/// repaired run to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of one file in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileResult {
    Success {
        strategy: RepairStrategy,
        output: PathBuf,
    },
    Skipped {
        reason: String,
    },
}

/// Totals for a finished (or cancelled) batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Names of files repaired and written, sorted
    pub succeeded: Vec<String>,
    /// `(name, reason)` for every skipped file, sorted by name
    pub skipped: Vec<(String, String)>,
    /// Files never dispatched because the batch was cancelled
    pub not_attempted: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.skipped.len() + self.not_attempted
    }

    /// True when every listed file was repaired
    pub fn is_success(&self) -> bool {
        self.skipped.is_empty() && self.not_attempted == 0
    }

    fn record(&mut self, file_name: String, result: FileResult) {
        match result {
            FileResult::Success { .. } => self.succeeded.push(file_name),
            FileResult::Skipped { reason } => self.skipped.push((file_name, reason)),
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Repair operation complete:")?;
        writeln!(f, "  Total files: {}", self.total())?;
        writeln!(f, "  Successfully repaired: {}", self.succeeded.len())?;
        writeln!(f, "  Skipped: {}", self.skipped.len())?;
        for (name, reason) in &self.skipped {
            writeln!(f, "    \"{}\": {}", name, reason)?;
        }
        if self.not_attempted > 0 {
            writeln!(f, "  Not attempted (cancelled): {}", self.not_attempted)?;
        }
        Ok(())
    }
}

/// Repair one file on disk and write the result to `output`
pub fn repair_file(
    reference: &ReferenceMetadata,
    input: &Path,
    output: &Path,
    config: &RepairConfig,
) -> Result<RepairStrategy> {
    let bytes = read_damaged(input)?;
    let name = display_name(input);
    let outcome = repair_one(reference, bytes, &name, config)?;
    write_atomic(outcome.file.as_bytes(), output)?;
    Ok(outcome.strategy)
}

/// Repair a pre-listed set of files from `folder`
///
/// Every dispatched file produces exactly one reporter call. Results arrive
/// in completion order; the returned summary is sorted by name. Output paths
/// are planned up front so no two inputs write the same file.
pub fn repair_batch(
    reference: &ReferenceMetadata,
    files: &[PathBuf],
    folder: &Path,
    config: &RepairConfig,
    reporter: &dyn RepairReporter,
    cancel: &CancelToken,
) -> BatchSummary {
    let total = files.len();
    let done = AtomicUsize::new(0);

    let jobs: Vec<(&PathBuf, PathBuf)> = files
        .iter()
        .zip(plan_output_paths(folder, files))
        .collect();

    let process = |(input, output): &(&PathBuf, PathBuf)| -> Option<(String, FileResult)> {
        if cancel.is_cancelled() {
            return None;
        }
        let name = display_name(input);
        let output = output.clone();

        let result = match repair_file(reference, input, &output, config) {
            Ok(strategy) => {
                info!("{name}: repaired with {strategy}");
                reporter.report_file_repaired(&name, strategy, &output);
                FileResult::Success { strategy, output }
            }
            Err(e) => {
                warn!("{name}: skipped: {e}");
                let reason = e.to_string();
                reporter.report_file_skipped(&name, &reason);
                FileResult::Skipped { reason }
            }
        };

        let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
        reporter.report_progress(
            &format!("Processed {finished} of {total} files"),
            finished as f64 / total as f64,
        );
        Some((name, result))
    };

    let results: Vec<Option<(String, FileResult)>> = if config.parallel {
        let threads = config.effective_threads();
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(|| jobs.par_iter().map(process).collect()),
            Err(e) => {
                warn!("could not build a {threads}-thread pool ({e}), using the global pool");
                jobs.par_iter().map(process).collect()
            }
        }
    } else {
        jobs.iter().map(process).collect()
    };

    let mut summary = BatchSummary::default();
    for entry in results {
        match entry {
            Some((name, result)) => summary.record(name, result),
            None => summary.not_attempted += 1,
        }
    }
    summary.succeeded.sort();
    summary.skipped.sort();
    summary
}

/// Load the reference, list `folder` and repair every candidate
///
/// Returns `Err` only for fatal errors: an unusable reference or an
/// unlistable folder. Outputs go to `<folder>/Repaired/`. The reference is
/// left out of the batch when it lives in `folder`, however its path is
/// spelled.
pub fn repair_folder(
    reference_path: &Path,
    folder: &Path,
    config: &RepairConfig,
    reporter: &dyn RepairReporter,
    cancel: &CancelToken,
) -> Result<BatchSummary> {
    let started = Instant::now();
    let reference = ReferenceMetadata::from_path(reference_path)?;
    let format = reference.format();
    info!(
        "reference {}: {} ch, {} Hz, {} bits, header {} bytes",
        reference_path.display(),
        format.channels,
        format.sample_rate,
        format.bits_per_sample,
        reference.header_len()
    );

    let files: Vec<PathBuf> = list_candidate_files(folder)?
        .into_iter()
        .filter(|path| !is_same_file(path, reference_path))
        .collect();
    reporter.report_repair_start(reference_path, files.len());

    let summary = repair_batch(&reference, &files, folder, config, reporter, cancel);
    reporter.report_repair_complete(&summary);

    let elapsed = started.elapsed();
    info!("batch of {} files took {:.2?}", summary.total(), elapsed);
    reporter.report_elapsed(elapsed);
    Ok(summary)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
