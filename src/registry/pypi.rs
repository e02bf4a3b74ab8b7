//! PyPI registry client.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::error::RegistryError;
use crate::types::PackageRecord;

const PYPI_API: &str = "https://pypi.org/pypi";
const PYPI_SIMPLE: &str = "https://pypi.org/simple/";

// Both endpoints get finite, independent deadlines. The simple index is a
// large page, but an unbounded hang on a flaky network is worse than a
// missed fuzzy result.
const METADATA_TIMEOUT: Duration = Duration::from_secs(20);
const INDEX_TIMEOUT: Duration = Duration::from_secs(15);

/// PyPI registry client.
pub struct PypiClient {
    client: Client,
    api_url: String,
    simple_url: String,
}

impl PypiClient {
    pub fn new() -> Self {
        Self::with_base_urls(PYPI_API.to_string(), PYPI_SIMPLE.to_string())
    }

    pub fn with_base_urls(api_url: String, simple_url: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            simple_url,
        }
    }

    /// Exact-match metadata lookup against the JSON API.
    ///
    /// A single attempt, no retries. Any non-success status means the
    /// package does not exist and maps to `Ok(None)`; transport failures
    /// are errors because an unreachable registry says nothing about
    /// whether the package exists.
    pub async fn get_package(&self, name: &str) -> Result<Option<PackageRecord>, RegistryError> {
        let url = format!("{}/{}/json", self.api_url, name);
        debug!(package = name, url = %url, "fetching pypi metadata");

        let response = self
            .client
            .get(&url)
            .timeout(METADATA_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            debug!(package = name, status = %response.status(), "no exact match");
            return Ok(None);
        }

        let body = response.text().await?;
        let pkg: PypiPackageResponse = serde_json::from_str(&body)?;
        Ok(Some(pkg.info.into()))
    }

    /// Substring search over the full simple index, deduplicated in
    /// first-seen document order, truncated to `limit` when bounded.
    ///
    /// Best-effort by contract: any failure degrades to an empty result
    /// set so fuzzy search never blocks the exact-match path.
    pub async fn search_index(&self, query: &str, limit: Option<usize>) -> Vec<String> {
        let body = match self.fetch_index().await {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "simple index fetch failed, skipping fuzzy search");
                return Vec::new();
            }
        };

        let mut names = extract_matching_names(&body, query);
        if let Some(limit) = limit {
            names.truncate(limit);
        }
        names
    }

    async fn fetch_index(&self) -> Result<String, RegistryError> {
        debug!(url = %self.simple_url, "fetching pypi simple index");

        let response = self
            .client
            .get(&self.simple_url)
            .timeout(INDEX_TIMEOUT)
            .send()
            .await?;

        Ok(response.text().await?)
    }
}

impl Default for PypiClient {
    fn default() -> Self {
        Self::new()
    }
}

// PyPI JSON API response types
#[derive(Debug, Deserialize)]
struct PypiPackageResponse {
    info: PypiInfo,
}

#[derive(Debug, Deserialize)]
struct PypiInfo {
    name: String,
    version: String,
    summary: Option<String>,
    author: Option<String>,
    license: Option<String>,
    home_page: Option<String>,
    project_urls: Option<BTreeMap<String, String>>,
}

impl From<PypiInfo> for PackageRecord {
    fn from(info: PypiInfo) -> Self {
        PackageRecord {
            name: info.name,
            version: info.version,
            summary: non_empty(info.summary),
            author: non_empty(info.author),
            license: non_empty(info.license),
            homepage: non_empty(info.home_page),
            project_urls: info.project_urls.unwrap_or_default(),
        }
    }
}

/// PyPI serves missing fields as either null or "" depending on the
/// package's upload tooling; normalize both to absence.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Pull package names out of simple-index anchors whose href contains the
/// query (case-insensitive). The index is a flat anchor-per-package page
/// with a stable shape, so a regex scan over the raw text is enough; no
/// HTML tree needed.
///
/// Names are deduplicated keeping first-seen document order, which makes
/// results reproducible for a given index body.
fn extract_matching_names(body: &str, query: &str) -> Vec<String> {
    let body = body.to_lowercase();
    let query = query.to_lowercase();

    let pattern = format!(r#"href="([^"]*{}[^"]*)""#, regex::escape(&query));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(err) => {
            warn!(error = %err, "query produced an uncompilable pattern");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for cap in re.captures_iter(&body) {
        let href = cap[1].trim_end_matches('/');
        let name = href.rsplit('/').next().unwrap_or(href);

        if !name.is_empty() && name.contains(&query) && seen.insert(name.to_string()) {
            names.push(name.to_string());
        }
    }

    names
}
