//! Aggregated scan results.

use crate::scanner::traits::{PortState, ProbeResult};
use crate::types::{HostAddress, Port};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Open ports found on one host, in the caller's port order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPorts {
    pub host: HostAddress,
    pub open_ports: Vec<Port>,
}

/// The finished result of a scan.
///
/// Hosts appear in expansion order and every expanded host has an entry,
/// with an empty port list when nothing answered. Built only by the
/// scanner's aggregation step; read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Target specification as given.
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Probes that ran to a classification.
    pub probes_completed: usize,
    pub open_count: usize,
    pub closed_count: usize,
    pub unreachable_count: usize,
    /// The scan was cancelled; only completed probes are reported.
    pub cancelled: bool,
    hosts: Vec<HostPorts>,
    /// Open `(port_index, port)` pairs per host, in arrival order until finalized.
    #[serde(skip)]
    pending: Vec<Vec<(usize, Port)>>,
}

impl ScanReport {
    /// Start a report covering `hosts`, all with no open ports yet.
    pub(crate) fn new(target: impl Into<String>, hosts: &[HostAddress]) -> Self {
        let now = Utc::now();
        Self {
            target: target.into(),
            started_at: now,
            completed_at: now,
            duration_ms: 0,
            probes_completed: 0,
            open_count: 0,
            closed_count: 0,
            unreachable_count: 0,
            cancelled: false,
            hosts: hosts
                .iter()
                .map(|host| HostPorts {
                    host: host.clone(),
                    open_ports: Vec::new(),
                })
                .collect(),
            pending: vec![Vec::new(); hosts.len()],
        }
    }

    /// Record one probe, in any arrival order. `host_index` is the host's
    /// position in expansion order and `port_index` the port's position in
    /// the caller's list. Only open ports are retained.
    pub(crate) fn record(&mut self, host_index: usize, port_index: usize, result: &ProbeResult) {
        self.probes_completed += 1;
        match result.state {
            PortState::Open => {
                self.open_count += 1;
                if let Some(slot) = self.pending.get_mut(host_index) {
                    slot.push((port_index, result.port));
                }
            }
            PortState::Closed => self.closed_count += 1,
            PortState::Unreachable => self.unreachable_count += 1,
        }
    }

    /// Put each host's open ports in caller order, stamp the completion time
    /// and freeze the report.
    pub(crate) fn finalize(mut self, cancelled: bool) -> Self {
        for (entry, mut slot) in self.hosts.iter_mut().zip(std::mem::take(&mut self.pending)) {
            slot.sort_unstable_by_key(|(index, _)| *index);
            entry.open_ports.extend(slot.into_iter().map(|(_, port)| port));
        }

        self.completed_at = Utc::now();
        self.duration_ms = (self.completed_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64;
        self.cancelled = cancelled;
        self
    }

    /// Every scanned host with its open ports.
    pub fn hosts(&self) -> &[HostPorts] {
        &self.hosts
    }

    /// Only hosts with at least one open port.
    pub fn hosts_with_open_ports(&self) -> impl Iterator<Item = &HostPorts> {
        self.hosts.iter().filter(|h| !h.open_ports.is_empty())
    }

    /// Open ports of `host`, or `None` if the host was not part of the scan.
    pub fn open_ports(&self, host: &HostAddress) -> Option<&[Port]> {
        self.hosts
            .iter()
            .find(|h| h.host.ip == host.ip)
            .map(|h| h.open_ports.as_slice())
    }

    /// A one-line summary.
    pub fn summary(&self) -> String {
        format!(
            "{} - {} hosts, {} open, {} closed, {} unreachable [{:.2}s]{}",
            self.target,
            self.hosts.len(),
            self.open_count,
            self.closed_count,
            self.unreachable_count,
            self.duration_ms as f64 / 1000.0,
            if self.cancelled { " (cancelled)" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;

    fn host(ip: &str) -> HostAddress {
        HostAddress::from(ip.parse::<IpAddr>().unwrap())
    }

    #[test]
    fn test_record_counts_and_open_ports() {
        let hosts = vec![host("10.0.0.1"), host("10.0.0.2")];
        let mut report = ScanReport::new("10.0.0.0/30", &hosts);
        let p22 = Port::new(22).unwrap();
        let p80 = Port::new(80).unwrap();

        report.record(0, 0, &ProbeResult::closed(hosts[0].clone(), p22, "refused"));
        report.record(0, 1, &ProbeResult::open(hosts[0].clone(), p80));
        report.record(1, 0, &ProbeResult::unreachable(hosts[1].clone(), p22, "timeout"));
        let report = report.finalize(false);

        assert_eq!(report.probes_completed, 3);
        assert_eq!(report.open_count, 1);
        assert_eq!(report.closed_count, 1);
        assert_eq!(report.unreachable_count, 1);
        assert_eq!(report.open_ports(&hosts[0]), Some(&[p80][..]));
        assert_eq!(report.open_ports(&hosts[1]), Some(&[] as &[Port]));
        assert_eq!(report.hosts_with_open_ports().count(), 1);
        assert!(!report.cancelled);
    }

    #[test]
    fn test_out_of_order_results_finalize_in_port_order() {
        let hosts = vec![host("10.0.0.1")];
        let mut report = ScanReport::new("10.0.0.1", &hosts);
        let list: Vec<Port> = [443u16, 22, 80]
            .iter()
            .map(|&p| Port::new(p).unwrap())
            .collect();

        for index in [2usize, 0, 1] {
            report.record(0, index, &ProbeResult::open(hosts[0].clone(), list[index]));
        }
        let report = report.finalize(false);

        assert_eq!(report.open_ports(&hosts[0]), Some(&list[..]));
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("pending").is_none());
    }

    #[test]
    fn test_summary_marks_cancelled() {
        let report = ScanReport::new("10.0.0.5", &[host("10.0.0.5")]).finalize(true);
        assert!(report.summary().ends_with("(cancelled)"));
    }
}
