//! TCP connect probe.
//!
//! Uses the operating system's socket API to attempt a full TCP handshake.
//! An established connection is dropped immediately; the probe only asserts
//! reachability.

use crate::scanner::traits::{PortProbe, ProbeResult};
use crate::types::{HostAddress, Port};
use async_trait::async_trait;
use std::io;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// TCP connect probe.
///
/// Does not require elevated privileges. Classification:
/// - handshake completes before the timeout: open
/// - connection refused (RST): closed
/// - timeout, unreachable network/host, or any other failure: unreachable
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProbe;

impl TcpProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PortProbe for TcpProbe {
    async fn probe(&self, host: &HostAddress, port: Port, limit: Duration) -> ProbeResult {
        let addr = host.socket_addr(port);

        match timeout(limit, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                trace!(%addr, "connection established");
                ProbeResult::open(host.clone(), port)
            }
            Ok(Err(e)) if e.kind() == io::ErrorKind::ConnectionRefused => {
                ProbeResult::closed(host.clone(), port, e.to_string())
            }
            Ok(Err(e)) => ProbeResult::unreachable(host.clone(), port, e.to_string()),
            Err(_) => ProbeResult::unreachable(
                host.clone(),
                port,
                format!("timed out after {}ms", limit.as_millis()),
            ),
        }
    }
}
