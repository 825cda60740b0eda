//! JSON output formatting.

use crate::cve::{CveCatalogue, CveRecord, MatchReport};
use crate::scanner::ScanReport;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct ScanDocument<'a> {
    scan: &'a ScanReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    matches: Option<&'a MatchReport>,
}

#[derive(Serialize)]
struct CatalogueDocument<'a> {
    source: &'a str,
    records: Vec<&'a CveRecord>,
}

/// Write the scan report (and matches, if any) as one JSON document.
pub fn write_json(
    out: &mut impl Write,
    report: &ScanReport,
    matches: Option<&MatchReport>,
) -> io::Result<()> {
    write_document(out, &ScanDocument { scan: report, matches })
}

/// Write a catalogue as a JSON document.
pub fn write_catalogue_json(
    out: &mut impl Write,
    source: &str,
    catalogue: &CveCatalogue,
) -> io::Result<()> {
    write_document(
        out,
        &CatalogueDocument {
            source,
            records: catalogue.iter().collect(),
        },
    )
}

fn write_document(out: &mut impl Write, document: &impl Serialize) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, document).map_err(io::Error::other)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Port;

    #[test]
    fn test_catalogue_json_shape() {
        let catalogue = CveCatalogue::from_records([CveRecord::new(
            "CVE-1",
            "desc",
            Port::new(80).unwrap(),
        )]);

        let mut buf = Vec::new();
        write_catalogue_json(&mut buf, "offline", &catalogue).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["source"], "offline");
        assert_eq!(value["records"][0]["id"], "CVE-1");
        assert_eq!(value["records"][0]["affected_port"], 80);
    }
}
