use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::error::ManifestError;

/// Base URL of the Melodi API; the catalog listing and the synthesized
/// bulk-file links both hang off it.
pub const MELODI_API_BASE: &str = "https://api.insee.fr/melodi";

/// One language-tagged string from a localized label list.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalizedText {
    pub lang: String,
    pub content: String,
}

/// Thematic grouping reference carried by a catalog entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeRef {
    pub label: Vec<LocalizedText>,
}

/// Temporal coverage block; only the start of the period is used.
#[derive(Debug, Clone, Deserialize)]
pub struct TemporalCoverage {
    #[serde(rename = "startPeriod")]
    pub start_period: String,
}

/// Product sub-record nested under a collection-level entry (shape B).
/// Carries its own access URL, declared format and size, and packaging.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "accessURL")]
    pub access_url: String,
    pub format: String,
    #[serde(rename = "byteSize", default)]
    pub byte_size: Option<u64>,
    #[serde(rename = "packageFormat", default)]
    pub package_format: Option<String>,
    #[serde(default)]
    pub issued: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
}

/// One raw catalog entry. Collection-level fields are always present in
/// shape A; entries additionally carrying `product` sub-records feed the
/// shape B normalization pass.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub identifier: String,
    pub title: Vec<LocalizedText>,
    #[serde(default)]
    pub theme: Vec<ThemeRef>,
    #[serde(default)]
    pub issued: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
    #[serde(default)]
    pub relations: Option<Vec<String>>,
    #[serde(default)]
    pub temporal: Option<TemporalCoverage>,
    #[serde(default)]
    pub product: Option<Vec<ProductRecord>>,
}

/// Synthesized download link for the bulk CSV export of a collection-level
/// entry. The source publishes one such archive per identifier.
pub fn bulk_file_url(identifier: &str) -> String {
    format!("{MELODI_API_BASE}/file/{identifier}/{identifier}_CSV_FR")
}

/// Browser-like header set; the asset endpoints reject clients without it.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
             AppleWebKit/537.36 (KHTML, like Gecko) \
             Chrome/129.0.0.0 Safari/537.36",
        ),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("fr-FR,fr;q=0.9,en;q=0.8"),
    );
    headers
}

pub trait CatalogClient: Send + Sync {
    fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, ManifestError>;
}

#[derive(Clone)]
pub struct CatalogHttpClient {
    client: Client,
    base_url: String,
}

impl CatalogHttpClient {
    pub fn new() -> Result<Self, ManifestError> {
        let client = Client::builder()
            .default_headers(browser_headers())
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| ManifestError::CatalogHttp(err.to_string()))?;
        Ok(Self {
            client,
            base_url: MELODI_API_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn catalog_url(&self) -> String {
        format!("{}/catalog/all", self.base_url)
    }
}

impl CatalogClient for CatalogHttpClient {
    /// One unauthenticated read of the full catalog. Any failure here is
    /// fatal to the run: there is nothing to reconcile without the catalog,
    /// and an unreachable catalog is an operator problem, not a transient
    /// one, so there is no retry.
    fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, ManifestError> {
        let response = self
            .client
            .get(self.catalog_url())
            .send()
            .map_err(|err| ManifestError::CatalogHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "catalog request failed".to_string());
            return Err(ManifestError::CatalogStatus { status, message });
        }
        response
            .json::<Vec<CatalogEntry>>()
            .map_err(|err| ManifestError::CatalogParse(err.to_string()))
    }
}
