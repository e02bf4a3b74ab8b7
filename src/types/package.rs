use std::collections::BTreeMap;

/// Metadata snapshot for one package, fetched fresh from the registry on
/// every lookup. Never cached or persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    pub summary: Option<String>,
    pub author: Option<String>,
    pub license: Option<String>,
    pub homepage: Option<String>,
    /// Labeled project URLs (e.g. "Repository", "Source"). BTreeMap keeps
    /// iteration order stable so rendering is deterministic.
    pub project_urls: BTreeMap<String, String>,
}
