//! End-to-end: target → scan → catalogue → matches.

use async_trait::async_trait;
use portcve::cve::{correlate, Correlator, CveStore, OfflineSource};
use portcve::scanner::{PortProbe, ProbeResult, ScanOptions, Scanner};
use portcve::types::{HostAddress, Port, PortList, TargetSpec};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::net::TcpListener;
use tokio_test::{assert_err, assert_ok};

/// Reports only port 80 open, on every host.
struct OnlyHttp;

#[async_trait]
impl PortProbe for OnlyHttp {
    async fn probe(&self, host: &HostAddress, port: Port, _timeout: Duration) -> ProbeResult {
        if port.as_u16() == 80 {
            ProbeResult::open(host.clone(), port)
        } else {
            ProbeResult::closed(host.clone(), port, "connection refused")
        }
    }
}

fn catalogue_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn simulated_scan_correlates_against_offline_file() {
    let scanner = Scanner::new(Arc::new(OnlyHttp), ScanOptions::default());
    let spec = TargetSpec::parse("10.0.0.5").unwrap();
    let ports: PortList = "22,80,443".parse().unwrap();

    let report = assert_ok!(scanner.scan(&spec, &ports).await);
    let open: Vec<u16> = report.hosts()[0].open_ports.iter().map(|p| p.as_u16()).collect();
    assert_eq!(open, vec![80]);

    let file = catalogue_file(
        r#"[{"CVE_id": "CVE-1", "description": "web", "port": "80"},
            {"CVE_id": "CVE-2", "description": "ssh", "port": "22"},
            {"CVE_id": "CVE-1", "description": "dup", "port": "443"}]"#,
    );
    let catalogue = assert_ok!(CveStore::load(file.path()));
    let matches = correlate(&report, &catalogue);

    assert_eq!(matches.len(), 1);
    let m = &matches.as_slice()[0];
    assert_eq!(m.host.ip.to_string(), "10.0.0.5");
    assert_eq!(m.port.as_u16(), 80);
    assert_eq!(m.cve.id, "CVE-1");
    assert_eq!(m.cve.description, "web");
}

#[tokio::test]
async fn block_scan_matches_each_host() {
    let scanner = Scanner::new(Arc::new(OnlyHttp), ScanOptions::default().with_concurrency(4));
    let spec = TargetSpec::parse("192.168.50.0/30").unwrap();
    let ports: PortList = "80".parse().unwrap();
    let file = catalogue_file(r#"[{"CVE_id": "CVE-9", "description": "", "port": 80}]"#);

    let report = assert_ok!(scanner.scan(&spec, &ports).await);
    let correlator = Correlator::new(Box::new(OfflineSource::new(file.path())));
    let matches = assert_ok!(correlator.run(&report).await);

    let hosts: Vec<String> = matches.iter().map(|m| m.host.ip.to_string()).collect();
    assert_eq!(hosts, vec!["192.168.50.1", "192.168.50.2"]);
}

#[tokio::test]
async fn tcp_scan_of_loopback_finds_listener() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let open = listener.local_addr().unwrap().port();
    let closed = {
        let spare = TcpListener::bind("127.0.0.1:0").await.unwrap();
        spare.local_addr().unwrap().port()
    };

    let scanner = Scanner::tcp(ScanOptions::default().with_timeout(Duration::from_millis(500)));
    let spec = TargetSpec::parse("127.0.0.1").unwrap();
    let ports: PortList = format!("{},{}", closed, open).parse().unwrap();

    let report = assert_ok!(scanner.scan(&spec, &ports).await);
    let found: Vec<u16> = report.hosts()[0].open_ports.iter().map(|p| p.as_u16()).collect();
    assert_eq!(found, vec![open]);
    assert_eq!(report.probes_completed, 2);
}

#[tokio::test]
async fn missing_catalogue_fails_correlation() {
    let scanner = Scanner::new(Arc::new(OnlyHttp), ScanOptions::default());
    let spec = TargetSpec::parse("10.0.0.5").unwrap();
    let report = scanner.scan(&spec, &"80".parse().unwrap()).await.unwrap();

    let correlator = Correlator::new(Box::new(OfflineSource::new("/nonexistent/cves.json")));
    assert_err!(correlator.run(&report).await);
}
