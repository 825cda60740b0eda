//! Scan subcommand implementation.
//!
//! Handles the `portcve scan <target>` command for port scanning and
//! optional CVE correlation.

use crate::cli::{CveArgs, OutputFormat};
use crate::config::AppSettings;
use crate::cve::Correlator;
use crate::error::CliResult;
use crate::output;
use crate::scanner::{ScanOptions, Scanner};
use crate::types::{PortList, TargetSpec};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::warn;

/// Scan a target for open ports.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Target to scan (IP, hostname, or CIDR notation)
    ///
    /// Examples:
    ///   192.168.1.1        Single IP address
    ///   example.com        Hostname
    ///   192.168.1.0/24     CIDR range
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Ports to scan, in order (e.g., "22,80,443" or "22,8000-8010")
    #[arg(short, long)]
    pub ports: String,

    /// Maximum number of concurrent probes
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Per-probe connection timeout in milliseconds
    #[arg(short = 't', long)]
    pub timeout: Option<u64>,

    /// Largest number of addresses the target may span (0 = unlimited)
    #[arg(long = "max-hosts", value_name = "N")]
    pub max_hosts: Option<u64>,

    /// Rate limit in probes per second (0 = unlimited)
    #[arg(short = 'r', long = "rate", default_value = "0")]
    pub rate_limit: u32,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,

    /// Check open ports against a CVE catalogue
    #[arg(long)]
    pub cve: bool,

    #[command(flatten)]
    pub cve_source: CveArgs,
}

impl ScanCommand {
    /// Execute the scan command.
    pub async fn execute(&self, settings: &AppSettings, verbose: bool, quiet: bool) -> CliResult<()> {
        let ports: PortList = self.ports.parse()?;
        let spec = TargetSpec::parse(&self.target)?;

        // Resolve the CVE source up front so a bad source fails before scanning
        let correlator = if self.cve {
            Some(Correlator::new(self.cve_source.build_source(settings)?))
        } else {
            None
        };

        let options = ScanOptions::default()
            .with_concurrency(self.concurrency.unwrap_or(settings.default_concurrency))
            .with_timeout(
                self.timeout
                    .map(Duration::from_millis)
                    .unwrap_or_else(|| settings.timeout()),
            )
            .with_rate_limit(self.rate_limit)
            .with_max_hosts(u128::from(self.max_hosts.unwrap_or(settings.max_hosts)));

        let plain = self.output == OutputFormat::Plain;
        if !quiet && plain {
            output::print_scan_header(&self.target, spec.estimated_host_count(), ports.len());
        }

        let mut scanner = Scanner::tcp(options);
        if verbose && plain {
            scanner = scanner.with_progress(progress_bar());
        }

        let token = scanner.cancellation_token();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, cancelling scan");
                token.cancel();
            }
        });

        let scan = scanner.scan(&spec, &ports).await;
        interrupt.abort();
        let report = scan?;

        if report.cancelled {
            output::print_warning("scan cancelled; only completed probes are reported");
        }

        let matches = match &correlator {
            Some(correlator) if !report.cancelled => Some(correlator.run(&report).await?),
            _ => None,
        };

        output::print_results(&report, matches.as_ref(), self.output)?;

        Ok(())
    }
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}
