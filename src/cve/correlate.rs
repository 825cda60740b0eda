//! Joins a scan report against a CVE catalogue.

use crate::cve::catalogue::{CveCatalogue, CveRecord};
use crate::cve::CveSource;
use crate::error::CatalogueResult;
use crate::scanner::ScanReport;
use crate::types::{HostAddress, Port};
use serde::Serialize;
use tracing::info;

/// One open port with one vulnerability recorded against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CveMatch {
    pub host: HostAddress,
    pub port: Port,
    pub cve: CveRecord,
}

/// Matches in host, then port, then catalogue order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MatchReport {
    matches: Vec<CveMatch>,
}

impl MatchReport {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CveMatch> {
        self.matches.iter()
    }

    pub fn as_slice(&self) -> &[CveMatch] {
        &self.matches
    }
}

/// Pair every open port in `report` with each record for exactly that port.
///
/// Open ports without a record produce nothing. Pure: the same inputs
/// always give the same report.
pub fn correlate(report: &ScanReport, catalogue: &CveCatalogue) -> MatchReport {
    let matches = report
        .hosts_with_open_ports()
        .flat_map(|entry| {
            entry.open_ports.iter().flat_map(move |&port| {
                catalogue.for_port(port).map(move |cve| CveMatch {
                    host: entry.host.clone(),
                    port,
                    cve: cve.clone(),
                })
            })
        })
        .collect();

    MatchReport { matches }
}

/// Correlates scan reports against whichever CVE source it was given.
pub struct Correlator {
    source: Box<dyn CveSource>,
}

impl Correlator {
    pub fn new(source: Box<dyn CveSource>) -> Self {
        Self { source }
    }

    /// Build the catalogue from the source, then correlate.
    ///
    /// A source failure fails the whole step; there is no partial result.
    pub async fn run(&self, report: &ScanReport) -> CatalogueResult<MatchReport> {
        let catalogue = self.source.catalogue().await?;
        let matches = correlate(report, &catalogue);

        info!(
            source = self.source.name(),
            catalogue = catalogue.len(),
            matches = matches.len(),
            "correlation finished"
        );

        Ok(matches)
    }
}
