//! Offline CVE catalogue loading.

use crate::cve::catalogue::CveCatalogue;
use crate::error::{CatalogueError, CatalogueResult};
use std::fs;
use std::path::Path;
use tracing::info;

/// Loads a catalogue from a local JSON file. No network access.
pub struct CveStore;

impl CveStore {
    /// Read and parse the catalogue at `path`.
    ///
    /// A missing or unreadable file is `CatalogueError::Io`; a file that is
    /// not the expected record array is `CatalogueError::Format`.
    pub fn load(path: impl AsRef<Path>) -> CatalogueResult<CveCatalogue> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| CatalogueError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalogue = CveCatalogue::from_json(&bytes)?;
        info!(
            path = %path.display(),
            records = catalogue.len(),
            duplicates = catalogue.duplicates_dropped(),
            "loaded offline CVE catalogue"
        );

        Ok(catalogue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_catalogue(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_file() {
        let file = write_catalogue(
            r#"[{"CVE_id": "CVE-1", "description": "test entry", "port": "80"}]"#,
        );

        let catalogue = CveStore::load(file.path()).unwrap();
        assert_eq!(catalogue.len(), 1);
        assert_eq!(catalogue.get("CVE-1").unwrap().description, "test entry");
    }

    #[test]
    fn test_load_is_deterministic() {
        let file = write_catalogue(
            r#"[{"CVE_id": "CVE-1", "description": "a", "port": "80"},
                {"CVE_id": "CVE-2", "description": "b", "port": 22}]"#,
        );

        let first: Vec<_> = CveStore::load(file.path()).unwrap().iter().cloned().collect();
        let second: Vec<_> = CveStore::load(file.path()).unwrap().iter().cloned().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CveStore::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CatalogueError::Io { .. }));
    }

    #[test]
    fn test_malformed_file_is_format_error() {
        let file = write_catalogue(r#"[{"CVE_id": "CVE-1""#);
        let err = CveStore::load(file.path()).unwrap_err();
        assert!(matches!(err, CatalogueError::Format(_)));
    }

    #[test]
    fn test_bundled_catalogue_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/cve_data.json");
        let catalogue = CveStore::load(path).unwrap();
        assert!(!catalogue.is_empty());
    }
}
