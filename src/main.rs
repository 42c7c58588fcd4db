//! # wiki_harvest
//!
//! Fetches a fixed batch of wiki pages and writes two artifacts:
//!
//! - a JSON Lines file with one `{url, title, text, tags}` record per page
//! - a raw `<Article>.html` snapshot per page
//!
//! ## Usage
//!
//! ```sh
//! wiki_harvest
//! wiki_harvest --config harvest.yaml --output-file robotics.jl
//! ```
//!
//! ## Architecture
//!
//! 1. **Setup**: load configuration, create the page directory and output file
//! 2. **Fetching**: request every page from the allowed hosts, a few at a time
//! 3. **Extraction**: title, paragraph/list text and URL tags per page
//! 4. **Output**: raw body to disk, record appended as one line
//!
//! Per-page fetch failures are logged and skipped. Any setup, encoding or
//! write failure aborts the run with a non-zero exit status.

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use config::HarvestConfig;
use error::RunError;
use models::BatchSummary;
use scrapers::wiki::Harvester;

#[tokio::main]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("wiki_harvest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    match run(&args).await {
        Ok(summary) => {
            let elapsed = start_time.elapsed();
            info!(
                ?elapsed,
                secs = elapsed.as_secs(),
                millis = elapsed.subsec_millis(),
                recorded = summary.recorded,
                archived = summary.archived,
                failed = summary.failed,
                "Total time elapsed"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Run aborted");
            eprintln!("wiki_harvest: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Cli) -> Result<BatchSummary, RunError> {
    let config = match &args.config {
        Some(path) => HarvestConfig::load(path)?,
        None => HarvestConfig::default(),
    };
    let config = args.apply(config);

    let harvester = Harvester::new(config).await?;
    harvester.run().await
}
