//! Probe trait abstraction.
//!
//! Defines a common interface for single-port reachability checks,
//! so the scanner can be driven by the TCP probe or a simulated one in tests.

use crate::types::{HostAddress, Port};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Reachability classification of a single (host, port) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    /// A connection was established before the timeout.
    Open,
    /// The remote actively refused the connection.
    Closed,
    /// The attempt timed out or the network path failed.
    Unreachable,
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// Result of probing a single port on a single host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// The host that was probed.
    pub host: HostAddress,
    /// The port that was probed.
    pub port: Port,
    /// Classification of the attempt.
    pub state: PortState,
    /// Why the port is not open, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl ProbeResult {
    /// An open port.
    pub fn open(host: HostAddress, port: Port) -> Self {
        Self {
            host,
            port,
            state: PortState::Open,
            cause: None,
        }
    }

    /// A closed port, with the refusal detail.
    pub fn closed(host: HostAddress, port: Port, cause: impl Into<String>) -> Self {
        Self {
            host,
            port,
            state: PortState::Closed,
            cause: Some(cause.into()),
        }
    }

    /// An unreachable port, with the timeout or network failure detail.
    pub fn unreachable(host: HostAddress, port: Port, cause: impl Into<String>) -> Self {
        Self {
            host,
            port,
            state: PortState::Unreachable,
            cause: Some(cause.into()),
        }
    }

    /// Check if the port is open.
    pub fn is_open(&self) -> bool {
        self.state == PortState::Open
    }
}

/// A single bounded-time connectivity check.
///
/// Implementations never retry and never hold a connection open; any
/// established connection is released before `probe` returns. Failures are
/// folded into the returned classification rather than surfaced as errors.
///
/// # Example
///
/// ```ignore
/// use portcve::scanner::{PortProbe, TcpProbe};
///
/// let result = TcpProbe.probe(&host, port, Duration::from_secs(1)).await;
/// println!("{} is {}", result.port, result.state);
/// ```
#[async_trait]
pub trait PortProbe: Send + Sync {
    /// Probe `port` on `host`, giving up after `timeout`.
    async fn probe(&self, host: &HostAddress, port: Port, timeout: Duration) -> ProbeResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_state_display() {
        assert_eq!(PortState::Open.to_string(), "open");
        assert_eq!(PortState::Closed.to_string(), "closed");
        assert_eq!(PortState::Unreachable.to_string(), "unreachable");
    }

    #[test]
    fn test_probe_result_constructors() {
        let host = HostAddress::from("10.0.0.5".parse::<std::net::IpAddr>().unwrap());
        let port = Port::new(80).unwrap();

        let open = ProbeResult::open(host.clone(), port);
        assert!(open.is_open());
        assert_eq!(open.cause, None);

        let closed = ProbeResult::closed(host, port, "connection refused");
        assert!(!closed.is_open());
        assert_eq!(closed.cause.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_probe_result_serializes_state_lowercase() {
        let host = HostAddress::from("10.0.0.5".parse::<std::net::IpAddr>().unwrap());
        let result = ProbeResult::unreachable(host, Port::new(22).unwrap(), "timed out");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["state"], "unreachable");
        assert_eq!(json["port"], 22);
    }
}
