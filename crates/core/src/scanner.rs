//! Printable-text scanning for binary containers.
//!
//! Formats without a structured reader still embed their visible text as
//! contiguous printable spans between control bytes. The scanner pulls those
//! spans out and drops anything shorter than the configured run length.

use regex::Regex;

/// Default minimum number of characters in a kept run.
pub const DEFAULT_MIN_RUN_LEN: usize = 5;

/// Separator placed between kept runs.
pub const RUN_SEPARATOR: &str = "\n\n";

/// Scanner settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Runs shorter than this are treated as structure bytes, not text.
    pub min_run_len: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            min_run_len: DEFAULT_MIN_RUN_LEN,
        }
    }
}

/// Extracts printable-ASCII runs from raw bytes.
#[derive(Debug, Clone)]
pub struct BinaryScanner {
    run_regex: Regex,
}

impl Default for BinaryScanner {
    fn default() -> Self {
        Self::new(ScannerConfig::default())
    }
}

impl BinaryScanner {
    pub fn new(config: ScannerConfig) -> Self {
        let min = config.min_run_len.max(1);
        // Space through tilde, plus ASCII tab, LF, CR, VT and FF.
        let pattern = format!(r"[\x20-\x7E\t\n\r\x0B\x0C]{{{},}}", min);
        let run_regex = Regex::new(&pattern).expect("printable run pattern is valid");
        Self { run_regex }
    }

    /// All qualifying runs, left to right.
    pub fn runs(&self, buffer: &[u8]) -> Vec<String> {
        let decoded = String::from_utf8_lossy(buffer);
        self.run_regex
            .find_iter(&decoded)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Runs joined with a blank line, or an empty string when none qualify.
    pub fn scan(&self, buffer: &[u8]) -> String {
        let runs = self.runs(buffer);
        log::debug!("Binary scan found {} printable runs in {} bytes", runs.len(), buffer.len());
        runs.join(RUN_SEPARATOR)
    }
}

/// Scan with the default run length.
pub fn scan(buffer: &[u8]) -> String {
    BinaryScanner::default().scan(buffer)
}
