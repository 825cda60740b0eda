//! Vulnerability catalogue sources and correlation.
//!
//! A run picks exactly one [`CveSource`]: the offline file or one of the
//! remote feeds. The resulting [`CveCatalogue`] is joined against a scan
//! report by [`Correlator`].

mod catalogue;
mod correlate;
mod feed;
mod store;

pub use catalogue::{CveCatalogue, CveRecord};
pub use correlate::{correlate, CveMatch, Correlator, MatchReport};
pub use feed::{
    CveFeedClient, FeedEndpoints, FeedKind, DEFAULT_MITRE_ENDPOINT, DEFAULT_NVD_ENDPOINT,
};
pub use store::CveStore;

use crate::error::CatalogueResult;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;

/// An opaque feed credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret, for building the request only.
    pub(crate) fn expose(&self) -> &str {
        &self.0
    }

    /// Replace any occurrence of the secret in `text`.
    pub(crate) fn redact(&self, text: &str) -> String {
        if self.0.is_empty() {
            text.to_string()
        } else {
            text.replace(&self.0, "***")
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Something that can produce a CVE catalogue for one run.
#[async_trait]
pub trait CveSource: Send + Sync {
    /// Short name for logs and output.
    fn name(&self) -> &str;

    /// Build the catalogue.
    async fn catalogue(&self) -> CatalogueResult<CveCatalogue>;
}

/// The offline JSON catalogue file.
#[derive(Debug, Clone)]
pub struct OfflineSource {
    path: PathBuf,
}

impl OfflineSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CveSource for OfflineSource {
    fn name(&self) -> &str {
        "offline"
    }

    async fn catalogue(&self) -> CatalogueResult<CveCatalogue> {
        CveStore::load(&self.path)
    }
}

/// A remote feed (NVD- or MITRE-style) with its credential.
#[derive(Debug, Clone)]
pub struct FeedSource {
    client: CveFeedClient,
    kind: FeedKind,
    credential: Credential,
}

impl FeedSource {
    /// Select the feed by name; unknown names are rejected here.
    pub fn new(
        client: CveFeedClient,
        source_name: &str,
        credential: Credential,
    ) -> CatalogueResult<Self> {
        Ok(Self {
            client,
            kind: source_name.parse()?,
            credential,
        })
    }

    pub fn kind(&self) -> FeedKind {
        self.kind
    }
}

#[async_trait]
impl CveSource for FeedSource {
    fn name(&self) -> &str {
        self.kind.name()
    }

    async fn catalogue(&self) -> CatalogueResult<CveCatalogue> {
        self.client.fetch_kind(self.kind, &self.credential).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogueError;
    use std::time::Duration;

    #[test]
    fn test_credential_never_prints() {
        let credential = Credential::new("hunter2");
        assert_eq!(credential.to_string(), "***");
        assert!(!format!("{:?}", credential).contains("hunter2"));
        assert_eq!(credential.redact("key=hunter2&x=1"), "key=***&x=1");
    }

    #[test]
    fn test_feed_source_rejects_unknown_name() {
        let client = CveFeedClient::new(Duration::from_secs(1)).unwrap();
        let err = FeedSource::new(client, "exploitdb", Credential::new("k")).unwrap_err();
        assert!(matches!(err, CatalogueError::UnsupportedSource(_)));
    }

    #[test]
    fn test_feed_source_names() {
        let client = CveFeedClient::new(Duration::from_secs(1)).unwrap();
        let nvd = FeedSource::new(client.clone(), "nvd", Credential::new("k")).unwrap();
        let mitre = FeedSource::new(client, "mitre", Credential::new("k")).unwrap();
        assert_eq!(nvd.name(), "nvd");
        assert_eq!(mitre.kind(), FeedKind::Mitre);
    }

    #[tokio::test]
    async fn test_offline_source_missing_file() {
        let source = OfflineSource::new("/nonexistent/cve_data.json");
        let err = source.catalogue().await.unwrap_err();
        assert!(matches!(err, CatalogueError::Io { .. }));
    }
}
