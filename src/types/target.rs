//! Target specification types with CIDR and hostname support.
//!
//! Provides flexible target parsing supporting:
//! - Single IP addresses (IPv4 and IPv6)
//! - CIDR notation (192.168.1.0/24)
//! - Hostnames (example.com)

use crate::types::Port;
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use tracing::debug;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// A concrete host address produced by expanding a [`TargetSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostAddress {
    /// The target text this address came from (hostname, IP or CIDR).
    pub origin: String,
    /// The resolved IP address.
    pub ip: IpAddr,
}

impl HostAddress {
    /// Create a new host address.
    pub fn new(origin: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            origin: origin.into(),
            ip,
        }
    }

    /// The socket address for a probe against `port`.
    pub fn socket_addr(&self, port: Port) -> SocketAddr {
        SocketAddr::new(self.ip, port.as_u16())
    }

    /// `host:port` text, with IPv6 literals in brackets (`[::1]:22`).
    pub fn endpoint(&self, port: Port) -> String {
        self.socket_addr(port).to_string()
    }
}

impl From<IpAddr> for HostAddress {
    fn from(ip: IpAddr) -> Self {
        Self::new(ip.to_string(), ip)
    }
}

impl fmt::Display for HostAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ip)
    }
}

/// Error type for target parsing and resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("invalid target format: {0}")]
    InvalidFormat(String),
    #[error("invalid CIDR notation: {0}")]
    InvalidCidr(String),
    #[error("failed to resolve hostname '{0}': {1}")]
    Resolution(String, String),
    #[error("no IP addresses found for hostname '{0}'")]
    NoAddresses(String),
}

impl TargetError {
    /// Whether the target text itself was rejected, as opposed to a lookup failure.
    pub fn is_invalid_target(&self) -> bool {
        matches!(self, Self::InvalidFormat(_) | Self::InvalidCidr(_))
    }
}

/// A validated target specification.
///
/// Supports:
/// - Single IP: "192.168.1.1"
/// - CIDR: "192.168.1.0/24"
/// - Hostname: "example.com"
/// - IPv6: "::1", "2001:db8::/120"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// A single IP address.
    Single(IpAddr),
    /// A CIDR network range.
    Cidr(IpNetwork),
    /// A hostname to be resolved.
    Hostname(String),
}

impl TargetSpec {
    /// Parse a target specification from a string.
    pub fn parse(s: &str) -> Result<Self, TargetError> {
        let s = s.trim();

        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(Self::Single(ip));
        }

        if s.contains('/') {
            return s
                .parse()
                .map(Self::Cidr)
                .map_err(|_| TargetError::InvalidCidr(s.to_string()));
        }

        if is_valid_hostname(s) {
            return Ok(Self::Hostname(s.to_string()));
        }

        Err(TargetError::InvalidFormat(s.to_string()))
    }

    /// Expand this target into concrete host addresses.
    ///
    /// CIDR blocks yield addresses in ascending numeric order. IPv4 blocks
    /// with a prefix of /30 or shorter skip the network and broadcast
    /// addresses; /31, /32 and all IPv6 blocks yield every address.
    /// Hostnames are looked up once and yield the first address returned.
    pub async fn expand(&self) -> Result<Vec<HostAddress>, TargetError> {
        match self {
            Self::Single(ip) => Ok(vec![HostAddress::from(*ip)]),
            Self::Cidr(network) => Ok(expand_network(network)),
            Self::Hostname(hostname) => {
                let response = system_resolver()
                    .lookup_ip(hostname.as_str())
                    .await
                    .map_err(|e| TargetError::Resolution(hostname.clone(), e.to_string()))?;

                let ip = response
                    .iter()
                    .next()
                    .ok_or_else(|| TargetError::NoAddresses(hostname.clone()))?;

                debug!(%hostname, %ip, "resolved target hostname");
                Ok(vec![HostAddress::new(hostname.clone(), ip)])
            }
        }
    }

    /// Number of addresses this target spans before expansion.
    pub fn estimated_host_count(&self) -> u128 {
        match self {
            Self::Single(_) | Self::Hostname(_) => 1,
            Self::Cidr(network) => block_size(network),
        }
    }
}

impl FromStr for TargetSpec {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(ip) => write!(f, "{}", ip),
            Self::Cidr(network) => write!(f, "{}", network),
            Self::Hostname(hostname) => write!(f, "{}", hostname),
        }
    }
}

/// A resolver reading `/etc/resolv.conf` (or the platform equivalent), falling
/// back to the built-in upstreams when the system configuration is unusable.
fn system_resolver() -> TokioAsyncResolver {
    TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
        debug!(error = %e, "no usable system resolver config, using defaults");
        TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
    })
}

fn block_size(network: &IpNetwork) -> u128 {
    let (bits, prefix) = match network {
        IpNetwork::V4(net) => (32u32, net.prefix() as u32),
        IpNetwork::V6(net) => (128u32, net.prefix() as u32),
    };
    let host_bits = bits - prefix;
    if host_bits >= 128 {
        u128::MAX
    } else {
        1u128 << host_bits
    }
}

fn expand_network(network: &IpNetwork) -> Vec<HostAddress> {
    let origin = network.to_string();
    let skip_edges = matches!(network, IpNetwork::V4(net) if net.prefix() <= 30);
    let (network_addr, broadcast) = match network {
        IpNetwork::V4(net) => (IpAddr::V4(net.network()), IpAddr::V4(net.broadcast())),
        IpNetwork::V6(net) => (IpAddr::V6(net.network()), IpAddr::V6(net.network())),
    };

    network
        .iter()
        .filter(|ip| !skip_edges || (*ip != network_addr && *ip != broadcast))
        .map(|ip| HostAddress::new(origin.clone(), ip))
        .collect()
}

/// Check if a string is a valid hostname.
fn is_valid_hostname(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }

    // Each label must be 1-63 characters
    for label in s.split('.') {
        if label.is_empty() || label.len() > 63 {
            return false;
        }
        // Must start and end with alphanumeric
        if !label.chars().next().is_some_and(|c| c.is_ascii_alphanumeric()) {
            return false;
        }
        if !label.chars().last().is_some_and(|c| c.is_ascii_alphanumeric()) {
            return false;
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return false;
        }
    }

    // An all-numeric dotted name is a malformed IP, not a host
    !s.split('.').all(|label| label.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn expand(s: &str) -> Vec<HostAddress> {
        TargetSpec::parse(s).unwrap().expand().await.unwrap()
    }

    #[test]
    fn test_parse_ipv4() {
        let spec = TargetSpec::parse("192.168.1.1").unwrap();
        assert!(matches!(spec, TargetSpec::Single(IpAddr::V4(_))));
    }

    #[test]
    fn test_parse_ipv6() {
        let spec = TargetSpec::parse("::1").unwrap();
        assert!(matches!(spec, TargetSpec::Single(IpAddr::V6(_))));
    }

    #[test]
    fn test_parse_cidr_v4() {
        let spec = TargetSpec::parse("192.168.1.0/24").unwrap();
        if let TargetSpec::Cidr(network) = spec {
            assert_eq!(network.prefix(), 24);
        } else {
            panic!("Expected CIDR");
        }
    }

    #[test]
    fn test_parse_hostname() {
        let spec = TargetSpec::parse("scanme.example.com").unwrap();
        assert!(matches!(spec, TargetSpec::Hostname(_)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let bad_cidr = TargetSpec::parse("10.0.0.0/33").unwrap_err();
        assert!(matches!(bad_cidr, TargetError::InvalidCidr(_)));
        assert!(bad_cidr.is_invalid_target());

        assert!(matches!(
            TargetSpec::parse("300.1.1.1"),
            Err(TargetError::InvalidFormat(_))
        ));
        assert!(matches!(
            TargetSpec::parse("bad host!"),
            Err(TargetError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_accepts_large_blocks() {
        let spec = TargetSpec::parse("10.0.0.0/15").unwrap();
        assert!(matches!(spec, TargetSpec::Cidr(_)));
        assert_eq!(spec.estimated_host_count(), 131_072);

        let spec = TargetSpec::parse("2001:db8::/64").unwrap();
        assert_eq!(spec.estimated_host_count(), 1u128 << 64);
    }

    #[tokio::test]
    async fn test_expand_block_wider_than_slash_16() {
        let hosts = expand("10.0.0.0/15").await;
        assert_eq!(hosts.len(), (1usize << 17) - 2);
        assert_eq!(hosts[0].ip.to_string(), "10.0.0.1");
        assert_eq!(hosts[hosts.len() - 1].ip.to_string(), "10.1.255.254");
    }

    #[tokio::test]
    async fn test_expand_localhost_uses_local_resolution() {
        let hosts = expand("localhost").await;
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].origin, "localhost");
        assert!(hosts[0].ip.is_loopback());
    }

    #[tokio::test]
    async fn test_expand_single_is_identity() {
        let hosts = expand("10.0.0.5").await;
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].ip.to_string(), "10.0.0.5");
    }

    #[tokio::test]
    async fn test_expand_excludes_network_and_broadcast() {
        for prefix in 20u32..=30 {
            let hosts = expand(&format!("192.168.0.0/{}", prefix)).await;
            assert_eq!(hosts.len() as u64, (1u64 << (32 - prefix)) - 2);
        }

        let hosts = expand("192.168.1.0/29").await;
        let ips: Vec<String> = hosts.iter().map(|h| h.ip.to_string()).collect();
        assert_eq!(
            ips,
            vec![
                "192.168.1.1",
                "192.168.1.2",
                "192.168.1.3",
                "192.168.1.4",
                "192.168.1.5",
                "192.168.1.6"
            ]
        );
    }

    #[tokio::test]
    async fn test_expand_point_to_point_blocks_keep_all() {
        assert_eq!(expand("10.0.0.0/31").await.len(), 2);
        assert_eq!(expand("10.0.0.7/32").await.len(), 1);
    }

    #[tokio::test]
    async fn test_expand_ipv6_block() {
        let hosts = expand("2001:db8::/126").await;
        assert_eq!(hosts.len(), 4);
        assert_eq!(hosts[0].ip.to_string(), "2001:db8::");
    }

    #[tokio::test]
    async fn test_expand_is_restartable() {
        let spec = TargetSpec::parse("172.16.0.0/28").unwrap();
        assert_eq!(spec.expand().await.unwrap(), spec.expand().await.unwrap());
    }

    #[test]
    fn test_endpoint_brackets_ipv6() {
        let port = Port::new(22).unwrap();
        let v6 = HostAddress::from("::1".parse::<IpAddr>().unwrap());
        assert_eq!(v6.endpoint(port), "[::1]:22");
        let v4 = HostAddress::from("10.0.0.5".parse::<IpAddr>().unwrap());
        assert_eq!(v4.endpoint(port), "10.0.0.5:22");
    }

    #[test]
    fn test_valid_hostname() {
        assert!(is_valid_hostname("example.com"));
        assert!(is_valid_hostname("sub.example.com"));
        assert!(is_valid_hostname("my-server"));
        assert!(!is_valid_hostname(""));
        assert!(!is_valid_hostname("-invalid.com"));
        assert!(!is_valid_hostname("10.0.0"));
    }
}
