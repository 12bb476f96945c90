use anyhow::Context;
use std::path::PathBuf;
use std::process;

use wavsplice::batch::{repair_folder, CancelToken};
use wavsplice::config::RepairConfig;
use wavsplice::parse_args;
use wavsplice::reporters::{
    ConsoleRepairReporter, RepairReporter, Reporter, SilentRepairReporter,
};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let matches = parse_args();
    let quiet = matches.get_flag("quiet");

    let reporter: Box<dyn RepairReporter> = if quiet {
        Box::new(SilentRepairReporter::new())
    } else {
        Box::new(ConsoleRepairReporter::new())
    };

    match run(&matches, reporter.as_ref()) {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(e) => {
            reporter.report_error(&format!("{:#}", e));
            process::exit(2);
        }
    }
}

/// Returns whether every candidate file was repaired
fn run(matches: &clap::ArgMatches, reporter: &dyn RepairReporter) -> anyhow::Result<bool> {
    let reference = PathBuf::from(
        matches
            .get_one::<String>("reference")
            .context("reference file is required")?,
    );
    let folder = PathBuf::from(
        matches
            .get_one::<String>("folder")
            .context("input folder is required")?,
    );
    let config = RepairConfig::from_args(matches);

    let summary = repair_folder(&reference, &folder, &config, reporter, &CancelToken::new())
        .with_context(|| format!("repair of {} aborted", folder.display()))?;

    Ok(summary.is_success())
}
