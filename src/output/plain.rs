//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::cve::{CveCatalogue, MatchReport};
use crate::scanner::ScanReport;
use console::style;
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Write a scan report, and the CVE matches when a check was run.
pub fn write_plain(
    out: &mut impl Write,
    report: &ScanReport,
    matches: Option<&MatchReport>,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out, "                    {} Scan Results", style("portcve").cyan().bold())?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Target:").bold(), report.target)?;
    writeln!(
        out,
        "  {} {} hosts, {} probes in {:.2}s",
        style("Statistics:").bold(),
        report.hosts().len(),
        report.probes_completed,
        report.duration_ms as f64 / 1000.0
    )?;
    writeln!(
        out,
        "              {} open, {} closed, {} unreachable",
        style(report.open_count).green().bold(),
        style(report.closed_count).red(),
        style(report.unreachable_count).yellow()
    )?;
    if report.cancelled {
        writeln!(out, "  {}", style("Scan was cancelled; results are partial.").yellow())?;
    }
    writeln!(out)?;

    let mut any_open = false;
    for entry in report.hosts_with_open_ports() {
        any_open = true;
        let ports: Vec<String> = entry.open_ports.iter().map(|p| p.to_string()).collect();
        writeln!(
            out,
            "  {:<40} {}",
            style(&entry.host.ip).white().bold(),
            style(ports.join(", ")).green()
        )?;
    }
    if !any_open {
        writeln!(out, "  {}", style("No open ports found.").dim())?;
    }

    if let Some(matches) = matches {
        writeln!(out)?;
        write_match_table(out, matches)?;
    }

    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    Ok(())
}

fn write_match_table(out: &mut impl Write, matches: &MatchReport) -> io::Result<()> {
    writeln!(out, "  {} {}", style("CVE matches:").bold(), matches.len())?;

    if matches.is_empty() {
        writeln!(out, "  {}", style("No known vulnerabilities for the open ports.").dim())?;
        return Ok(());
    }

    writeln!(out, "  {}", style(THIN_RULE).dim())?;
    writeln!(
        out,
        "  {:<39}  {:>5}  {:<16}  {}",
        style("HOST").bold(),
        style("PORT").bold(),
        style("CVE").bold(),
        style("DESCRIPTION").bold()
    )?;
    writeln!(out, "  {}", style(THIN_RULE).dim())?;

    for m in matches.iter() {
        writeln!(
            out,
            "  {:<39}  {:>5}  {:<16}  {}",
            m.host.ip,
            m.port,
            style(&m.cve.id).red().bold(),
            truncate_string(&m.cve.description, 60)
        )?;
    }

    writeln!(out, "  {}", style(THIN_RULE).dim())
}

/// Write every record of a catalogue.
pub fn write_catalogue(out: &mut impl Write, source: &str, catalogue: &CveCatalogue) -> io::Result<()> {
    writeln!(
        out,
        "{} {} records from {}",
        style("•").dim(),
        style(catalogue.len()).white().bold(),
        style(source).yellow()
    )?;
    for record in catalogue.iter() {
        writeln!(
            out,
            "  {:<16}  {:>5}  {}",
            style(&record.id).bold(),
            record.affected_port,
            truncate_string(&record.description, 70)
        )?;
    }
    Ok(())
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(target: &str, hosts: u128, ports: usize) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("portcve").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{} Target: {}", style("•").dim(), style(target).white().bold());
    println!(
        "{} Scanning {} ports on up to {} hosts...",
        style("•").dim(),
        style(ports).white().bold(),
        style(hosts).white().bold()
    );
    println!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Truncate a string to a maximum number of characters, adding ellipsis if truncated.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
