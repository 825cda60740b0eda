//! Error types for portcve.
//!
//! Uses `thiserror` for ergonomic error definitions. Closed or unreachable
//! ports are never errors; they are classifications in a `ProbeResult`.

use crate::types::{PortError, TargetError};
use std::path::PathBuf;
use thiserror::Error;

/// A whole-scan failure. The scan did not run, or did not run to a report.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("scan aborted: {0}")]
    Target(#[from] TargetError),

    #[error("scan aborted: no ports to scan")]
    EmptyPortList,

    #[error("scan aborted: target spans {hosts} addresses, limit is {limit}")]
    TooManyHosts { hosts: u128, limit: u128 },

    #[error("scan aborted: {0}")]
    InvalidOptions(String),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Failures while building a CVE catalogue from a file or a remote feed.
#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("cannot read CVE catalogue {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CVE catalogue: {0}")]
    Format(String),

    #[error("unsupported CVE source '{0}' (expected 'nvd' or 'mitre')")]
    UnsupportedSource(String),

    #[error("CVE feed request failed: {0}")]
    Transport(String),
}

/// Result type alias for catalogue operations.
pub type CatalogueResult<T> = Result<T, CatalogueError>;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),

    #[error("failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level error for command handlers.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Port(#[from] PortError),

    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for command handlers.
pub type CliResult<T> = Result<T, CliError>;
