//! Registry client errors.

use thiserror::Error;

/// Failures talking to the PyPI endpoints.
///
/// "Package not found" is deliberately absent: an exact lookup that gets a
/// non-success status yields `Ok(None)`. Only transport and decode failures
/// are errors, so callers can tell "doesn't exist" apart from "couldn't
/// reach the registry".
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("network error while accessing PyPI: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed registry response: {0}")]
    Json(#[from] serde_json::Error),
}
