//! The `verify` subcommand: inspect what previous runs stored.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use violationtracker_lib::{Config, Db, FileRunLog, RunLog, StoredViolation};

use crate::output::{print_json, print_run_log, print_violations_table, OutputFormat};

/// Arguments for the `verify` subcommand.
#[derive(Args)]
pub struct VerifyArgs {
    /// SQLite database path (overrides VIOLATIONS_DB)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Directory holding run logs (overrides VIOLATIONS_LOG_DIR)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Number of stored violations to show
    #[arg(long, default_value = "10")]
    pub limit: usize,

    /// Output format: table or json
    #[arg(long, default_value = "table")]
    pub output: String,
}

#[derive(Serialize)]
struct VerifyReport {
    total: i64,
    violations: Vec<StoredViolation>,
    run_logs: Vec<String>,
    latest_log: Option<RunLog>,
}

pub fn run(args: &VerifyArgs, config: &Config) -> Result<()> {
    let db_path = args.db.as_ref().unwrap_or(&config.db_path);
    let log_dir = args.log_dir.as_ref().unwrap_or(&config.log_dir);

    if !db_path.exists() {
        bail!("database not found: {}", db_path.display());
    }
    let db = Db::open(db_path)?;
    let total = db.violation_count()?;
    let violations = db.list_violations(args.limit)?;

    let logs = FileRunLog::new(log_dir);
    let run_logs = logs.list()?;
    let latest = logs.latest()?;

    match OutputFormat::parse(&args.output) {
        OutputFormat::Json => print_json(&VerifyReport {
            total,
            violations,
            run_logs,
            latest_log: latest.map(|(_, log)| log),
        }),
        OutputFormat::Table => {
            print_violations_table(&violations);
            println!("Total violations stored: {}", total);
            println!("Run logs in {}: {}", logs.dir().display(), run_logs.len());
            match &latest {
                Some((name, log)) => print_run_log(name, log),
                None => println!("No run logs found"),
            }
        }
    }

    Ok(())
}
