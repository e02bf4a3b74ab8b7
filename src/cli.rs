//! CLI argument definitions.

use clap::Parser;

use crate::commands::SearchCmd;

#[derive(Parser)]
#[command(name = "pysearch")]
#[command(about = "Reliable PyPI package search using the official APIs")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub search: SearchCmd,
}
