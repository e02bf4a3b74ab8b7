//! CLI command implementations.

mod search;

pub use search::SearchCmd;
