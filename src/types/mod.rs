//! Shared domain types.

mod package;

pub use package::PackageRecord;
