//! pysearch - PyPI package search by exact name with fuzzy fallback.

mod cli;
mod commands;
mod registry;
mod types;

use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins; --verbose only raises the default level. Logs go to
    // stderr so rendered results stay clean on stdout.
    let default_filter = if cli.search.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.search.run().await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
