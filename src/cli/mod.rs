//! CLI subcommand definitions and handlers.
//!
//! - `portcve scan <target> -p <ports>` - Scan a target, optionally checking CVEs
//! - `portcve cves` - List a CVE catalogue from the offline file or a feed
//! - `portcve config` - Show or initialise the settings file

mod config;
mod cves;
mod scan;

pub use config::ConfigCommand;
pub use cves::CvesCommand;
pub use scan::ScanCommand;

use crate::config::AppSettings;
use crate::cve::{CveFeedClient, CveSource, Credential, FeedSource, OfflineSource};
use crate::error::{CliError, CliResult};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// portcve - port reachability scanning with CVE correlation.
///
/// Probes a host or CIDR block for open TCP ports and matches the open
/// ports against a CVE catalogue loaded from a local file or fetched from
/// an NVD- or MITRE-style feed.
#[derive(Parser, Debug)]
#[command(name = "portcve")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Port scanner with CVE correlation", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to custom settings file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a target for open ports
    #[command(alias = "s")]
    Scan(ScanCommand),

    /// List the records of a CVE catalogue
    #[command(alias = "c")]
    Cves(CvesCommand),

    /// Show or create the settings file
    Config(ConfigCommand),
}

/// Where CVE records come from.
#[derive(Args, Debug, Clone)]
pub struct CveArgs {
    /// Fetch CVE data from a remote feed instead of the offline file
    #[arg(long)]
    pub online: bool,

    /// Remote feed to use with --online (nvd or mitre)
    #[arg(long, default_value = "nvd")]
    pub source: String,

    /// API key for the remote feed
    #[arg(long = "api-key", env = "PORTCVE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Offline CVE catalogue (JSON)
    #[arg(long = "cve-file", value_name = "PATH", conflicts_with = "online")]
    pub cve_file: Option<PathBuf>,

    /// Feed request timeout in milliseconds
    #[arg(long = "request-timeout", value_name = "MS")]
    pub request_timeout: Option<u64>,
}

impl CveArgs {
    /// Build the selected source. Unknown feed names and a missing API key
    /// are reported here, before any scanning or network traffic.
    pub fn build_source(&self, settings: &AppSettings) -> CliResult<Box<dyn CveSource>> {
        if !self.online {
            let path = self
                .cve_file
                .clone()
                .unwrap_or_else(|| settings.cve_data_path.clone());
            return Ok(Box::new(OfflineSource::new(path)));
        }

        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                CliError::Other("an API key is required for online CVE sources".to_string())
            })?;

        let timeout = self
            .request_timeout
            .map(Duration::from_millis)
            .unwrap_or_else(|| settings.request_timeout());
        let client = CveFeedClient::new(timeout)?.with_endpoints(settings.feed_endpoints());

        Ok(Box::new(FeedSource::new(
            client,
            &self.source,
            Credential::new(api_key),
        )?))
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}
