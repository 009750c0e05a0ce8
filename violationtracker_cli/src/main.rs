mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use violationtracker_lib::Config;

#[derive(Parser)]
#[command(name = "violationtracker")]
#[command(about = "Harvest Puerto Rico corporate violation records from Violation Tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the listing once and store new violations
    Run(commands::run::RunArgs),
    /// Show stored violations and the latest run log
    Verify(commands::verify::VerifyArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("violationtracker=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match &cli.command {
        Commands::Run(args) => commands::run::run(args, config).await?,
        Commands::Verify(args) => commands::verify::run(args, &config)?,
    }

    Ok(())
}
