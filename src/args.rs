use clap::{Arg, ArgAction, Command};
use std::fs;

fn existing_path(kind: &'static str) -> impl Fn(&str) -> Result<String, String> + Clone {
    move |input: &str| {
        let path = fs::canonicalize(input).map_err(|_| format!("Failed to resolve {kind} path"))?;
        if path.exists() {
            Ok(path.to_string_lossy().to_string())
        } else {
            Err(format!("{kind} does not exist"))
        }
    }
}

fn byte_count(input: &str) -> Result<String, String> {
    input
        .parse::<usize>()
        .map(|_| input.to_string())
        .map_err(|_| format!("'{input}' is not a byte count"))
}

pub fn build_command() -> Command {
    Command::new("wavsplice")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Repair damaged WAV files using the header of a known-good reference")
        .arg(
            Arg::new("reference")
                .help("Known-good WAV recorded with the same format as the damaged files")
                .required(true)
                .index(1)
                .value_parser(existing_path("Reference file")),
        )
        .arg(
            Arg::new("folder")
                .help("Folder containing damaged *.wav / *.wav.* files")
                .required(true)
                .index(2)
                .value_parser(existing_path("Input folder")),
        )
        .arg(
            Arg::new("prefix-bytes")
                .long("prefix-bytes")
                .help("Length of the corrupted prefix for fixed-window repair (default: 153605)")
                .value_name("BYTES")
                .value_parser(byte_count),
        )
        .arg(
            Arg::new("trailer-bytes")
                .long("trailer-bytes")
                .help("Length of the corrupted trailer for fixed-window repair (default: 334)")
                .value_name("BYTES")
                .value_parser(byte_count),
        )
        .arg(
            Arg::new("strip-min-len")
                .long("strip-min-len")
                .help("Files without a RIFF signature longer than this use fixed-window repair (default: off)")
                .value_name("BYTES")
                .value_parser(byte_count),
        )
        .arg(
            Arg::new("raw-truncation")
                .long("raw-truncation")
                .help("Recover files without a 'data' marker by cutting at the reference's data offset")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .help("Number of worker threads (0 = auto-detect)")
                .value_name("N")
                .default_value("0"),
        )
        .arg(
            Arg::new("no-parallel")
                .long("no-parallel")
                .help("Repair files one at a time")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Quiet mode - minimal output")
                .action(ArgAction::SetTrue),
        )
}

pub fn parse_args() -> clap::ArgMatches {
    build_command().get_matches()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepairConfig;
    use tempfile::TempDir;

    #[test]
    fn test_command_is_well_formed() {
        build_command().debug_assert();
    }

    #[test]
    fn test_config_from_args() {
        let dir = TempDir::new().unwrap();
        let reference = dir.path().join("ref.wav");
        std::fs::write(&reference, b"RIFF").unwrap();

        let matches = build_command()
            .try_get_matches_from([
                "wavsplice",
                reference.to_str().unwrap(),
                dir.path().to_str().unwrap(),
                "--prefix-bytes",
                "1000",
                "--trailer-bytes",
                "10",
                "--strip-min-len",
                "2000",
                "--raw-truncation",
                "--no-parallel",
            ])
            .unwrap();
        let config = RepairConfig::from_args(&matches);

        assert_eq!(config.corrupted_prefix_bytes, 1000);
        assert_eq!(config.corrupted_trailer_bytes, 10);
        assert_eq!(config.strip_min_len, 2000);
        assert!(config.raw_truncation);
        assert!(!config.parallel);
    }

    #[test]
    fn test_defaults_match_config() {
        let dir = TempDir::new().unwrap();
        let reference = dir.path().join("ref.wav");
        std::fs::write(&reference, b"RIFF").unwrap();

        let matches = build_command()
            .try_get_matches_from([
                "wavsplice",
                reference.to_str().unwrap(),
                dir.path().to_str().unwrap(),
            ])
            .unwrap();
        let config = RepairConfig::from_args(&matches);
        assert_eq!(config, RepairConfig::default());
        assert_eq!(
            config.corrupted_prefix_bytes,
            crate::config::DEFAULT_CORRUPTED_PREFIX_BYTES
        );
    }

    #[test]
    fn test_rejects_bad_byte_count() {
        let dir = TempDir::new().unwrap();
        let result = build_command().try_get_matches_from([
            "wavsplice",
            dir.path().to_str().unwrap(),
            dir.path().to_str().unwrap(),
            "--prefix-bytes",
            "lots",
        ]);
        assert!(result.is_err());
    }
}
