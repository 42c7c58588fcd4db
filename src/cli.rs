//! Command-line interface definitions for wiki_harvest.
//!
//! With no arguments the built-in batch runs with default output paths. A
//! YAML config file can replace any setting, and the flags below override the
//! file.

use crate::config::HarvestConfig;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Built-in page list, output.jl and wikipages/ in the working directory
/// wiki_harvest
///
/// # Custom pages and paths from a config file, two requests at a time
/// wiki_harvest --config harvest.yaml --concurrency 2
/// ```
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON Lines output file (overrides the config file)
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,

    /// Directory for raw HTML snapshots (overrides the config file)
    #[arg(short, long)]
    pub page_dir: Option<PathBuf>,

    /// Maximum number of requests in flight (overrides the config file)
    #[arg(long)]
    pub concurrency: Option<usize>,
}

impl Cli {
    /// Apply command-line overrides on top of `config`.
    pub fn apply(&self, mut config: HarvestConfig) -> HarvestConfig {
        if let Some(output_file) = &self.output_file {
            config.output_file = output_file.clone();
        }
        if let Some(page_dir) = &self.page_dir {
            config.page_dir = page_dir.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        config
    }
}
