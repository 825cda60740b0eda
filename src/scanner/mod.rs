//! Scanner module - fans probes out across a target's host×port space.
//!
//! Concurrent probing runs on the tokio runtime with a hard cap on probes in
//! flight. Results are collected by index so each host's open ports come out
//! in the caller's port order no matter which probe finishes first.

mod rate_limiter;
mod report;
pub mod tcp;
pub mod traits;

use crate::error::{ScanError, ScanResult};
use crate::types::{HostAddress, Port, PortList, TargetSpec};
use futures::future;
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub use rate_limiter::RateLimiter;
pub use report::{HostPorts, ScanReport};
pub use tcp::TcpProbe;
pub use traits::{PortProbe, PortState, ProbeResult};

/// Tunables for one scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Hard upper bound for each individual probe.
    pub timeout: Duration,
    /// Maximum number of probes in flight.
    pub concurrency: usize,
    /// Maximum probe launches per second, 0 for unlimited.
    pub rate_limit: u32,
    /// Largest number of addresses a target may span, 0 for unlimited.
    pub max_hosts: u128,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3),
            concurrency: 500,
            rate_limit: 0,
            max_hosts: 65_536,
        }
    }
}

impl ScanOptions {
    /// Set the per-probe timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the concurrency bound.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the probe rate limit.
    pub fn with_rate_limit(mut self, rate_limit: u32) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Set the host limit.
    pub fn with_max_hosts(mut self, max_hosts: u128) -> Self {
        self.max_hosts = max_hosts;
        self
    }

    fn validate(&self) -> ScanResult<()> {
        if self.concurrency == 0 {
            return Err(ScanError::InvalidOptions(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(ScanError::InvalidOptions(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Drives a [`PortProbe`] across every (host, port) pair of a target.
pub struct Scanner {
    probe: Arc<dyn PortProbe>,
    options: ScanOptions,
    cancel: CancellationToken,
    progress: Option<ProgressBar>,
}

impl Scanner {
    /// Create a scanner using the given probe.
    pub fn new(probe: Arc<dyn PortProbe>, options: ScanOptions) -> Self {
        Self {
            probe,
            options,
            cancel: CancellationToken::new(),
            progress: None,
        }
    }

    /// Create a scanner using TCP connect probes.
    pub fn tcp(options: ScanOptions) -> Self {
        Self::new(Arc::new(TcpProbe::new()), options)
    }

    /// Use `cancel` to stop the scan from outside.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Tick `progress` once per completed probe.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// A token that cancels this scanner's scans.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Expand `spec` and probe every host against every port in `ports`.
    ///
    /// Individual closed or unreachable ports are recorded, not raised.
    /// The scan fails only when the target cannot be expanded or spans more
    /// than `max_hosts` addresses, the port list is empty, or the options are
    /// unusable. If the scan is cancelled, probes not yet started are skipped,
    /// in-flight probes are abandoned, and the report holds only probes that
    /// finished. Results are folded as they arrive; only open ports are kept.
    pub async fn scan(&self, spec: &TargetSpec, ports: &PortList) -> ScanResult<ScanReport> {
        if ports.is_empty() {
            return Err(ScanError::EmptyPortList);
        }
        self.options.validate()?;

        let spans = spec.estimated_host_count();
        if self.options.max_hosts != 0 && spans > self.options.max_hosts {
            return Err(ScanError::TooManyHosts {
                hosts: spans,
                limit: self.options.max_hosts,
            });
        }

        let hosts = spec.expand().await?;
        let ports = ports.as_slice();
        let total = hosts.len() * ports.len();

        info!(
            target = %spec,
            hosts = hosts.len(),
            ports = ports.len(),
            concurrency = self.options.concurrency,
            timeout_ms = self.options.timeout.as_millis() as u64,
            "starting scan"
        );

        if let Some(ref pb) = self.progress {
            pb.set_length(total as u64);
        }

        let mut report = ScanReport::new(spec.to_string(), &hosts);
        let completed = self.run_probes(&hosts, ports, &mut report).await;
        let cancelled = self.cancel.is_cancelled() && completed < total;
        let report = report.finalize(cancelled);

        if let Some(ref pb) = self.progress {
            pb.finish_and_clear();
        }

        info!(
            open = report.open_count,
            closed = report.closed_count,
            unreachable = report.unreachable_count,
            cancelled,
            duration_ms = report.duration_ms,
            "scan finished"
        );

        Ok(report)
    }

    /// Run the cross product with bounded concurrency, recording each result
    /// into `report` as it arrives. Returns the number of completed probes.
    async fn run_probes(
        &self,
        hosts: &[HostAddress],
        ports: &[Port],
        report: &mut ScanReport,
    ) -> usize {
        let limiter = RateLimiter::per_second(self.options.rate_limit);
        let timeout = self.options.timeout;
        let cancel = &self.cancel;

        let jobs = hosts
            .iter()
            .flat_map(|host| ports.iter().map(move |&port| (host, port)))
            .enumerate();

        let results = stream::iter(jobs)
            .take_while(|_| future::ready(!cancel.is_cancelled()))
            .map(|(index, (host, port))| {
                let probe = Arc::clone(&self.probe);
                let limiter = limiter.clone();
                let progress = self.progress.clone();

                async move {
                    if let Some(limiter) = limiter {
                        limiter.wait().await;
                    }

                    // The bound holds even for probes that ignore their timeout
                    let result = tokio::time::timeout(timeout, probe.probe(host, port, timeout))
                        .await
                        .unwrap_or_else(|_| {
                            ProbeResult::unreachable(
                                host.clone(),
                                port,
                                format!("timed out after {}ms", timeout.as_millis()),
                            )
                        });
                    debug!(
                        host = %result.host,
                        port = result.port.as_u16(),
                        state = %result.state,
                        cause = result.cause.as_deref().unwrap_or(""),
                        "probe finished"
                    );

                    if let Some(pb) = progress {
                        pb.inc(1);
                        if result.is_open() {
                            pb.set_message(format!("open: {}", host.endpoint(port)));
                        }
                    }

                    (index, result)
                }
            })
            .buffer_unordered(self.options.concurrency)
            .take_until(cancel.cancelled());
        tokio::pin!(results);

        let mut completed = 0;
        while let Some((index, result)) = results.next().await {
            report.record(index / ports.len(), index % ports.len(), &result);
            completed += 1;
        }
        completed
    }
}
