//! Remote CVE feed client.
//!
//! One GET per fetch, credential passed as a query parameter, response body
//! in the same array shape as the offline file. No pagination, no retry.

use crate::cve::catalogue::CveCatalogue;
use crate::cve::Credential;
use crate::error::{CatalogueError, CatalogueResult};
use reqwest::{Client, Url};
use std::error::Error as _;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Default NVD-style endpoint.
pub const DEFAULT_NVD_ENDPOINT: &str = "https://api.nvd.nist.gov/vuln/search";
/// Default MITRE-style endpoint.
pub const DEFAULT_MITRE_ENDPOINT: &str = "https://cveawg.mitre.org/api/cve";

/// A supported remote feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Nvd,
    Mitre,
}

impl FeedKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Nvd => "nvd",
            Self::Mitre => "mitre",
        }
    }

    /// Query parameters for this feed, credential included.
    fn query<'a>(self, credential: &'a Credential) -> Vec<(&'static str, &'a str)> {
        match self {
            Self::Nvd => vec![("apiKey", credential.expose()), ("cpeName", "*")],
            Self::Mitre => vec![("api_key", credential.expose())],
        }
    }
}

impl FromStr for FeedKind {
    type Err = CatalogueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nvd" => Ok(Self::Nvd),
            "mitre" => Ok(Self::Mitre),
            _ => Err(CatalogueError::UnsupportedSource(s.to_string())),
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Base URLs for each feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEndpoints {
    pub nvd: String,
    pub mitre: String,
}

impl Default for FeedEndpoints {
    fn default() -> Self {
        Self {
            nvd: DEFAULT_NVD_ENDPOINT.to_string(),
            mitre: DEFAULT_MITRE_ENDPOINT.to_string(),
        }
    }
}

impl FeedEndpoints {
    fn for_kind(&self, kind: FeedKind) -> &str {
        match kind {
            FeedKind::Nvd => &self.nvd,
            FeedKind::Mitre => &self.mitre,
        }
    }
}

/// Fetches a catalogue from a named remote feed.
#[derive(Debug, Clone)]
pub struct CveFeedClient {
    http: Client,
    endpoints: FeedEndpoints,
}

impl CveFeedClient {
    /// Create a client whose requests give up after `request_timeout`.
    pub fn new(request_timeout: Duration) -> CatalogueResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("portcve/", env!("CARGO_PKG_VERSION")))
            .timeout(request_timeout)
            .build()
            .map_err(|e| CatalogueError::Transport(describe(&e.without_url())))?;

        Ok(Self {
            http,
            endpoints: FeedEndpoints::default(),
        })
    }

    /// Override the feed endpoints.
    pub fn with_endpoints(mut self, endpoints: FeedEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Fetch the catalogue from the feed called `source_name` ("nvd" or "mitre").
    ///
    /// Unknown names fail before any request is made.
    pub async fn fetch(
        &self,
        source_name: &str,
        credential: &Credential,
    ) -> CatalogueResult<CveCatalogue> {
        let kind: FeedKind = source_name.parse()?;
        self.fetch_kind(kind, credential).await
    }

    /// Fetch the catalogue from `kind`.
    pub async fn fetch_kind(
        &self,
        kind: FeedKind,
        credential: &Credential,
    ) -> CatalogueResult<CveCatalogue> {
        let endpoint = self.endpoints.for_kind(kind);
        let url = Url::parse(endpoint).map_err(|e| {
            CatalogueError::Transport(format!("invalid {} endpoint '{}': {}", kind, endpoint, e))
        })?;

        info!(source = %kind, %endpoint, "fetching CVE feed");

        let scrub = |e: reqwest::Error| {
            CatalogueError::Transport(credential.redact(&describe(&e.without_url())))
        };

        let response = self
            .http
            .get(url)
            .query(&kind.query(credential))
            .send()
            .await
            .map_err(scrub)?
            .error_for_status()
            .map_err(scrub)?;

        let body = response.bytes().await.map_err(scrub)?;
        let catalogue = CveCatalogue::from_json(&body)?;

        info!(
            source = %kind,
            records = catalogue.len(),
            duplicates = catalogue.duplicates_dropped(),
            "fetched CVE feed"
        );

        Ok(catalogue)
    }
}

/// Render an error with its source chain on one line.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
