//! # portcve - Port Reachability and CVE Correlation
//!
//! portcve probes a host or CIDR block for open TCP ports and joins the open
//! ports against a catalogue of known vulnerabilities.
//!
//! ## Features
//!
//! - **Flexible Targeting**: Single IPs (v4 and v6), hostnames, and CIDR ranges
//! - **Bounded Concurrency**: Async probes with a hard cap on probes in flight
//!   and a hard per-probe timeout
//! - **Deterministic Reports**: Open ports come out in the caller's port order
//! - **Pluggable CVE Sources**: Offline JSON file, NVD-style or MITRE-style feeds
//! - **Multiple Output Formats**: Plain text, JSON, and CSV
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portcve::cve::{correlate, CveStore};
//! use portcve::scanner::{ScanOptions, Scanner};
//! use portcve::types::{PortList, TargetSpec};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let spec = TargetSpec::parse("192.168.1.0/28")?;
//!     let ports: PortList = "22,80,443".parse()?;
//!
//!     let report = Scanner::tcp(ScanOptions::default()).scan(&spec, &ports).await?;
//!     let catalogue = CveStore::load("data/cve_data.json")?;
//!
//!     for m in correlate(&report, &catalogue).iter() {
//!         println!("{}:{} {}", m.host, m.port, m.cve.id);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Validated ports, port lists, targets and host addresses
//! - [`scanner`] - Probe trait, TCP probe, bounded fan-out and scan reports
//! - [`cve`] - CVE catalogue sources and the correlator
//! - [`config`] - Settings file handling
//! - [`error`] - Error types
//! - [`output`] - Output formatting utilities

pub mod cli;
pub mod config;
pub mod cve;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use cve::{correlate, CveCatalogue, CveRecord, CveSource, Correlator, MatchReport};
pub use error::{CatalogueError, CliError, ScanError};
pub use scanner::{PortProbe, PortState, ProbeResult, ScanOptions, ScanReport, Scanner};
pub use types::{HostAddress, Port, PortList, TargetSpec};
