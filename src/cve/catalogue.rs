//! CVE records and the in-memory catalogue.
//!
//! The offline file and both remote feeds share one wire shape: a JSON array
//! of objects with `CVE_id`, `description` and `port` fields. `port` may be a
//! string (`"443"`) or an integer.

use crate::error::{CatalogueError, CatalogueResult};
use crate::types::Port;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// One catalogued vulnerability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CveRecord {
    pub id: String,
    pub description: String,
    pub affected_port: Port,
}

impl CveRecord {
    pub fn new(id: impl Into<String>, description: impl Into<String>, affected_port: Port) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            affected_port,
        }
    }
}

#[derive(Deserialize)]
struct WireRecord {
    #[serde(rename = "CVE_id")]
    id: String,
    #[serde(default)]
    description: String,
    port: WirePort,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WirePort {
    Number(i64),
    Text(String),
}

impl WireRecord {
    fn into_record(self, index: usize) -> CatalogueResult<CveRecord> {
        if self.id.trim().is_empty() {
            return Err(CatalogueError::Format(format!(
                "record {}: empty CVE_id",
                index
            )));
        }

        let port = match self.port {
            WirePort::Number(n) => u16::try_from(n).ok().and_then(Port::new),
            WirePort::Text(s) => s.parse::<Port>().ok(),
        }
        .ok_or_else(|| {
            CatalogueError::Format(format!("record {} ({}): invalid port", index, self.id))
        })?;

        Ok(CveRecord::new(self.id, self.description, port))
    }
}

/// The set of CVE records loaded from one source for one run.
///
/// Keyed by id; when an id repeats, the first record wins. Insertion order
/// is kept and drives match ordering. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct CveCatalogue {
    records: Vec<CveRecord>,
    by_port: HashMap<Port, Vec<usize>>,
    duplicates_dropped: usize,
}

impl CveCatalogue {
    /// Build a catalogue, keeping the first record for each id.
    pub fn from_records(records: impl IntoIterator<Item = CveRecord>) -> Self {
        let mut catalogue = Self::default();
        let mut seen = HashSet::new();

        for record in records {
            if !seen.insert(record.id.clone()) {
                warn!(id = %record.id, "duplicate CVE id, keeping the first record");
                catalogue.duplicates_dropped += 1;
                continue;
            }
            catalogue
                .by_port
                .entry(record.affected_port)
                .or_default()
                .push(catalogue.records.len());
            catalogue.records.push(record);
        }

        catalogue
    }

    /// Parse the JSON array wire shape.
    pub fn from_json(bytes: &[u8]) -> CatalogueResult<Self> {
        let wire: Vec<WireRecord> =
            serde_json::from_slice(bytes).map_err(|e| CatalogueError::Format(e.to_string()))?;

        let records = wire
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_record(index))
            .collect::<CatalogueResult<Vec<_>>>()?;

        Ok(Self::from_records(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CveRecord> {
        self.records.iter()
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&CveRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Records affecting exactly `port`, in insertion order.
    pub fn for_port(&self, port: Port) -> impl Iterator<Item = &CveRecord> {
        self.by_port
            .get(&port)
            .into_iter()
            .flatten()
            .map(|&index| &self.records[index])
    }

    /// How many records were discarded as repeated ids.
    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }
}
