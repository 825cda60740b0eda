//! Output formatting module.
//!
//! Renders scan reports, CVE matches and catalogues as plain text, JSON or CSV.
//! The core never prints; only the command handlers call into here.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::{write_catalogue_csv, write_csv};
pub use json_format::{write_catalogue_json, write_json};
pub use plain::{
    print_error, print_info, print_scan_header, print_success, print_warning, write_catalogue,
    write_plain,
};

use crate::cli::OutputFormat;
use crate::cve::{CveCatalogue, MatchReport};
use crate::scanner::ScanReport;
use std::io;

/// Print a scan report (and matches, if a CVE check ran) to stdout.
pub fn print_results(
    report: &ScanReport,
    matches: Option<&MatchReport>,
    format: OutputFormat,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Plain => write_plain(&mut out, report, matches),
        OutputFormat::Json => write_json(&mut out, report, matches),
        OutputFormat::Csv => write_csv(out, report, matches),
    }
}

/// Print a catalogue to stdout.
pub fn print_catalogue(
    source: &str,
    catalogue: &CveCatalogue,
    format: OutputFormat,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Plain => write_catalogue(&mut out, source, catalogue),
        OutputFormat::Json => write_catalogue_json(&mut out, source, catalogue),
        OutputFormat::Csv => write_catalogue_csv(out, catalogue),
    }
}
