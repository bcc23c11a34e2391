//! Output formatting module.
//!
//! The reporting boundary: renders a finished [`ScanSummary`] as plain text
//! or JSON, and shows live progress while scanning.

mod json_format;
mod plain;
mod progress;

pub use json_format::{print_json, write_json, JsonReport};
pub use plain::{print_error, print_plain, print_scan_header, write_plain};
pub use progress::ProgressReporter;

use crate::scanner::ScanSummary;
use std::io;

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Format and print scan results according to the specified format.
pub fn print_results(summary: &ScanSummary, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => print_plain(summary),
        OutputFormat::Json => print_json(summary),
    }
}
