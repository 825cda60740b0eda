//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortList` parses the caller's port list while keeping the caller's order.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// A validated network port number (1-65535).
///
/// Using a newtype prevents accidental misuse of raw u16 values
/// and ensures port numbers are always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(value as u32))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl FromStr for Port {
    type Err = PortError;

    /// Parse a decimal port number. Values outside 1-65535 are rejected,
    /// including ones that do not fit a `u16`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let value: u32 = s
            .parse()
            .map_err(|_| PortError::InvalidFormat(s.to_string()))?;
        u16::try_from(value)
            .ok()
            .and_then(Port::new)
            .ok_or(PortError::OutOfRange(value))
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u32),
    #[error("invalid port number: {0}")]
    InvalidFormat(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
    #[error("empty port specification")]
    Empty,
}

/// A range of ports (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    start: Port,
    end: Port,
}

impl PortRange {
    /// Create a new port range.
    pub fn new(start: Port, end: Port) -> Result<Self, PortError> {
        if start.0 > end.0 {
            Err(PortError::InvalidRange(start.0, end.0))
        } else {
            Ok(Self { start, end })
        }
    }

    /// Get the number of ports in this range.
    pub const fn len(&self) -> usize {
        (self.end.0 - self.start.0) as usize + 1
    }

    /// A valid range always holds at least one port.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over all ports in this range, ascending.
    pub fn iter(&self) -> impl Iterator<Item = Port> {
        (self.start.0..=self.end.0).map(Port)
    }
}

impl FromStr for PortRange {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| PortError::InvalidFormat(s.to_string()))?;
        Self::new(start.parse()?, end.parse()?)
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// The caller's port list, in the order the caller gave it.
///
/// Supports formats like:
/// - Single port: "80"
/// - Comma-separated: "22,80,443"
/// - Range: "8000-8010"
/// - Mixed: "443,22,8000-8010"
///
/// Repeated ports keep their first position. Parsing is all-or-nothing:
/// one bad entry rejects the whole list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Port>", into = "Vec<Port>")]
pub struct PortList {
    ports: Vec<Port>,
    seen: HashSet<Port>,
}

impl PartialEq for PortList {
    fn eq(&self, other: &Self) -> bool {
        self.ports == other.ports
    }
}

impl Eq for PortList {}

impl From<Vec<Port>> for PortList {
    fn from(ports: Vec<Port>) -> Self {
        Self::from_ports(ports)
    }
}

impl From<PortList> for Vec<Port> {
    fn from(list: PortList) -> Self {
        list.ports
    }
}

impl PortList {
    /// Build a list from already-validated ports, dropping repeats.
    pub fn from_ports(ports: impl IntoIterator<Item = Port>) -> Self {
        let mut list = Self::default();
        for port in ports {
            list.push(port);
        }
        list
    }

    fn push(&mut self, port: Port) {
        if self.seen.insert(port) {
            self.ports.push(port);
        }
    }

    /// The ports in caller order.
    pub fn as_slice(&self) -> &[Port] {
        &self.ports
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Port> + '_ {
        self.ports.iter().copied()
    }
}

impl FromStr for PortList {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PortError::Empty);
        }

        let mut list = Self::default();
        for part in s.split(',') {
            let part = part.trim();
            if part.contains('-') {
                let range: PortRange = part.parse()?;
                range.iter().for_each(|port| list.push(port));
            } else {
                list.push(part.parse()?);
            }
        }

        Ok(list)
    }
}

impl fmt::Display for PortList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ports.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ports(list: &PortList) -> Vec<u16> {
        list.iter().map(Port::as_u16).collect()
    }

    #[test]
    fn test_port_validation() {
        assert!(Port::new(0).is_none());
        assert!(Port::new(1).is_some());
        assert!(Port::new(65535).is_some());
    }

    #[test]
    fn test_port_from_str_bounds() {
        assert_eq!("443".parse::<Port>().unwrap().as_u16(), 443);
        assert_eq!("0".parse::<Port>(), Err(PortError::OutOfRange(0)));
        assert_eq!("65536".parse::<Port>(), Err(PortError::OutOfRange(65536)));
        assert!(matches!("-1".parse::<Port>(), Err(PortError::InvalidFormat(_))));
        assert!(matches!("http".parse::<Port>(), Err(PortError::InvalidFormat(_))));
    }

    #[test]
    fn test_port_range() {
        let range: PortRange = "1-100".parse().unwrap();
        assert_eq!(range.len(), 100);
        assert!(matches!(
            "100-50".parse::<PortRange>(),
            Err(PortError::InvalidRange(100, 50))
        ));
    }

    #[test]
    fn test_port_list_keeps_caller_order() {
        let list: PortList = "443,22,80".parse().unwrap();
        assert_eq!(ports(&list), vec![443, 22, 80]);
    }

    #[test]
    fn test_port_list_ranges_and_dedup() {
        let list: PortList = "8002,8000-8003, 22,8000".parse().unwrap();
        assert_eq!(ports(&list), vec![8002, 8000, 8001, 8003, 22]);
    }

    #[test]
    fn test_port_list_full_range() {
        let list: PortList = "1-65535".parse().unwrap();
        assert_eq!(list.len(), 65535);
        assert_eq!(list.as_slice()[0].as_u16(), 1);
        assert_eq!(list.as_slice()[65534].as_u16(), 65535);

        let list: PortList = "443,1-65535,22".parse().unwrap();
        assert_eq!(list.len(), 65535);
        assert_eq!(list.as_slice()[0].as_u16(), 443);
        assert_eq!(list.as_slice()[1].as_u16(), 1);
    }

    #[test]
    fn test_port_list_serde_drops_repeats() {
        let list: PortList = serde_json::from_str("[80,22,80]").unwrap();
        assert_eq!(ports(&list), vec![80, 22]);
        assert_eq!(serde_json::to_string(&list).unwrap(), "[80,22]");
    }

    #[test]
    fn test_port_list_fails_fast() {
        assert_eq!("".parse::<PortList>(), Err(PortError::Empty));
        assert!("22,abc,80".parse::<PortList>().is_err());
        assert!("22,0".parse::<PortList>().is_err());
        assert!("22,,80".parse::<PortList>().is_err());
    }

    #[test]
    fn test_port_serde_rejects_zero() {
        assert!(serde_json::from_str::<Port>("0").is_err());
        assert_eq!(serde_json::from_str::<Port>("80").unwrap().as_u16(), 80);
    }
}
