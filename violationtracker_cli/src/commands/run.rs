//! The `run` subcommand: one harvest into SQLite.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use violationtracker_lib::{run_once, Config};

/// Arguments for the `run` subcommand.
#[derive(Args)]
pub struct RunArgs {
    /// SQLite database path (overrides VIOLATIONS_DB)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Directory for run logs (overrides VIOLATIONS_LOG_DIR)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Number of listing pages to scrape (overrides VIOLATIONS_PAGE_COUNT)
    #[arg(long)]
    pub pages: Option<u32>,
}

impl RunArgs {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = dir.clone();
        }
        if let Some(pages) = self.pages {
            config.pipeline.page_count = pages;
        }
        config
    }
}

pub async fn run(args: &RunArgs, config: Config) -> Result<()> {
    let config = args.apply(config);
    let status = run_once(&config).await;

    println!("{}", status.message);
    if !status.failed_pages.is_empty() {
        eprintln!("Pages with errors: {:?}", status.failed_pages);
    }
    if let Some(location) = &status.log_location {
        eprintln!("Run log: {}", location);
    }

    if !status.success {
        bail!("harvest failed");
    }
    Ok(())
}
