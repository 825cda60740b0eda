//! CSV output formatting.

use crate::cve::{CveCatalogue, MatchReport};
use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Write CSV rows: one per match when a CVE check ran, else one per open port.
pub fn write_csv(
    out: impl Write,
    report: &ScanReport,
    matches: Option<&MatchReport>,
) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    match matches {
        Some(matches) => {
            wtr.write_record(["host", "port", "cve_id", "description"])?;
            for m in matches.iter() {
                wtr.write_record([
                    &m.host.ip.to_string(),
                    &m.port.to_string(),
                    &m.cve.id,
                    &m.cve.description,
                ])?;
            }
        }
        None => {
            wtr.write_record(["host", "port", "state"])?;
            for entry in report.hosts_with_open_ports() {
                for port in &entry.open_ports {
                    wtr.write_record([
                        entry.host.ip.to_string().as_str(),
                        port.to_string().as_str(),
                        "open",
                    ])?;
                }
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Write a catalogue as CSV.
pub fn write_catalogue_csv(out: impl Write, catalogue: &CveCatalogue) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["cve_id", "port", "description"])?;
    for record in catalogue.iter() {
        wtr.write_record([
            &record.id,
            &record.affected_port.to_string(),
            &record.description,
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cve::CveRecord;
    use crate::types::Port;

    #[test]
    fn test_catalogue_csv_quotes_descriptions() {
        let catalogue = CveCatalogue::from_records([CveRecord::new(
            "CVE-1",
            "overflow, remote",
            Port::new(23).unwrap(),
        )]);

        let mut buf = Vec::new();
        write_catalogue_csv(&mut buf, &catalogue).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text, "cve_id,port,description\nCVE-1,23,\"overflow, remote\"\n");
    }
}
