//! Client for the PyPI registry endpoints.
//!
//! Two upstream surfaces: the JSON metadata API (`/pypi/<name>/json`) for
//! exact-match lookups and the simple index (`/simple/`) for substring
//! fuzzy search.

mod error;
mod pypi;

pub use error::RegistryError;
pub use pypi::PypiClient;
