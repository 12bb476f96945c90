//! Configuration for repair operations

/// Bytes scrambled at the start of a file by the ransomware variant this tool
/// was first written against. Not a WAV property; override per corruption.
pub const DEFAULT_CORRUPTED_PREFIX_BYTES: usize = 153_605;

/// Bytes appended at the end of a file by the same ransomware variant
pub const DEFAULT_CORRUPTED_TRAILER_BYTES: usize = 334;

/// Configuration for WAV repair operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairConfig {
    /// Length of the corrupted prefix stripped by `FixedWindowStrip`
    pub corrupted_prefix_bytes: usize,
    /// Length of the corrupted trailer stripped by `FixedWindowStrip`
    pub corrupted_trailer_bytes: usize,
    /// Files without a RIFF/WAVE signature longer than this use `FixedWindowStrip`
    /// (`usize::MAX` = only double-extension names do)
    pub strip_min_len: usize,
    /// Let `MarkerSplice` cut the damaged buffer at the reference's data
    /// offset when the damaged file has no `data` marker
    pub raw_truncation: bool,
    /// Number of worker threads (0 = auto-detect)
    pub threads: usize,
    /// Whether to repair files in parallel (false = single-threaded)
    pub parallel: bool,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            corrupted_prefix_bytes: DEFAULT_CORRUPTED_PREFIX_BYTES,
            corrupted_trailer_bytes: DEFAULT_CORRUPTED_TRAILER_BYTES,
            strip_min_len: usize::MAX,
            raw_truncation: false,
            threads: 0, // Auto-detect CPU cores
            parallel: true,
        }
    }
}

impl RepairConfig {
    pub fn with_window(mut self, prefix_bytes: usize, trailer_bytes: usize) -> Self {
        self.corrupted_prefix_bytes = prefix_bytes;
        self.corrupted_trailer_bytes = trailer_bytes;
        self
    }

    pub fn with_strip_min_len(mut self, strip_min_len: usize) -> Self {
        self.strip_min_len = strip_min_len;
        self
    }

    pub fn with_raw_truncation(mut self, enabled: bool) -> Self {
        self.raw_truncation = enabled;
        self
    }

    pub fn with_threads(mut self, threads: usize, parallel: bool) -> Self {
        self.threads = threads;
        self.parallel = parallel;
        self
    }

    pub fn from_args(matches: &clap::ArgMatches) -> Self {
        let defaults = Self::default();

        let parse = |name: &str| -> Option<usize> {
            matches
                .get_one::<String>(name)
                .and_then(|s| s.parse().ok())
        };

        let prefix = parse("prefix-bytes").unwrap_or(defaults.corrupted_prefix_bytes);
        let trailer = parse("trailer-bytes").unwrap_or(defaults.corrupted_trailer_bytes);
        let mut config = defaults.with_window(prefix, trailer);

        if let Some(min_len) = parse("strip-min-len") {
            config = config.with_strip_min_len(min_len);
        }

        let threads = parse("threads").unwrap_or(0);
        let parallel = !matches.get_flag("no-parallel");

        config
            .with_raw_truncation(matches.get_flag("raw-truncation"))
            .with_threads(threads, parallel)
    }

    /// Get effective thread count (auto-detect if 0)
    pub fn effective_threads(&self) -> usize {
        match (self.parallel, self.threads) {
            (false, _) => 1, // Sequential mode always uses single thread
            (true, 0) => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4), // Auto-detect CPU cores
            (true, n) => n,  // Use specified thread count
        }
    }
}
