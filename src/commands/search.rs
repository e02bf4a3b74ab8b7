//! Search command - exact-match lookup with fuzzy fallback over the
//! simple index.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::Args;
use futures::StreamExt;
use futures::stream;
use tracing::warn;
use url::Url;

use crate::registry::PypiClient;
use crate::types::PackageRecord;

const PYPI_WEB_SEARCH: &str = "https://pypi.org/search/";

/// Cap on in-flight metadata re-fetches while resolving fuzzy matches.
/// Each fetch is independent and failure-isolated; output keeps index
/// order regardless of completion order.
const RESOLVE_CONCURRENCY: usize = 4;

const MISSING: &str = "(not provided)";

/// Project-URL labels worth surfacing alongside the homepage.
const SOURCE_LABELS: [&str; 3] = ["repository", "github", "source"];

#[derive(Args)]
pub struct SearchCmd {
    /// Package name or substring to search for
    pub query: String,

    /// Max fuzzy matches to show (0 = unlimited)
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl SearchCmd {
    pub async fn run(&self) -> Result<u8> {
        self.run_with(&PypiClient::new()).await
    }

    /// The whole pipeline, returning the process exit code: 1 for a
    /// blank query, 0 otherwise (zero results is not a failure).
    pub async fn run_with(&self, client: &PypiClient) -> Result<u8> {
        let query = self.query.trim();
        if query.is_empty() {
            eprintln!("error: query must not be empty");
            eprintln!("usage: pysearch <package-name> [--limit N]");
            return Ok(1);
        }

        print!("{}", self.report(client, query).await?);
        Ok(0)
    }

    /// Render the full report for a non-empty query. Kept separate from
    /// the exit-code plumbing so tests can assert on the produced text.
    async fn report(&self, client: &PypiClient, query: &str) -> Result<String> {
        let mut out = String::new();

        // The exact-match path is strict: a transport failure here aborts
        // the run, since "unreachable" is not the same as "not found".
        let exact = client
            .get_package(query)
            .await
            .context("exact-match lookup failed")?;

        if let Some(ref record) = exact {
            writeln!(out, "Exact match:\n")?;
            writeln!(out, "{}\n", format_package(record))?;
        }

        let limit = (self.limit > 0).then_some(self.limit);
        let mut similar = client.search_index(query, limit).await;
        similar.retain(|name| !name.eq_ignore_ascii_case(query));

        if !similar.is_empty() {
            if limit.is_some() {
                // Second, unbounded fetch purely for the header count. One
                // extra round trip instead of threading the untruncated set
                // through the client.
                let mut all = client.search_index(query, None).await;
                all.retain(|name| !name.eq_ignore_ascii_case(query));
                let total = all.len().max(similar.len());
                writeln!(out, "Similar packages (showing {} of {}):\n", similar.len(), total)?;
            } else {
                writeln!(out, "Similar packages ({}):\n", similar.len())?;
            }

            let rendered: Vec<String> = stream::iter(similar.iter())
                .map(|name| resolve_one(client, name))
                .buffered(RESOLVE_CONCURRENCY)
                .collect()
                .await;

            for text in rendered {
                writeln!(out, "{}\n", text)?;
            }
        }

        if exact.is_none() && similar.is_empty() {
            writeln!(out, "No packages found matching '{}'.", query)?;
            writeln!(out, "Try the web search: {}", web_search_url(query)?)?;
        }

        Ok(out)
    }
}

/// Re-resolve one fuzzy match into its rendered form. Absence or a
/// transport hiccup only costs this candidate a placeholder line.
async fn resolve_one(client: &PypiClient, name: &str) -> String {
    match client.get_package(name).await {
        Ok(Some(record)) => format_package(&record),
        Ok(None) => format!("{} (details not available)", name),
        Err(err) => {
            warn!(package = name, error = %err, "could not resolve fuzzy match");
            format!("{} (details not available)", name)
        }
    }
}

fn web_search_url(query: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(PYPI_WEB_SEARCH, &[("q", query)])
}

/// Render one package record. Deterministic for a given record: project
/// URLs come from a BTreeMap, so label order is stable.
fn format_package(record: &PackageRecord) -> String {
    let mut lines = vec![
        format!("Package: {}", record.name),
        format!("Version: {}", record.version),
        format!("Summary: {}", record.summary.as_deref().unwrap_or(MISSING)),
        format!("Author: {}", record.author.as_deref().unwrap_or(MISSING)),
        format!("License: {}", record.license.as_deref().unwrap_or(MISSING)),
    ];

    if let Some(ref homepage) = record.homepage {
        lines.push(format!("Homepage: {}", homepage));
    }

    for (label, url) in &record.project_urls {
        if SOURCE_LABELS.iter().any(|l| label.eq_ignore_ascii_case(l)) {
            lines.push(format!("  {}: {}", label, url));
        }
    }

    lines.push(format!("Install: pip install {}", record.name));
    lines.join("\n")
}
