//! One complete harvest: scrape, store, log.

use violationtracker_api::{Client, SearchQuery};

use crate::config::Config;
use crate::db::{Db, PersistSummary, StorageError};
use crate::error::HarvestError;
use crate::pipeline::{PageFetcher, Pipeline};
use crate::run_log::{record_run, FileRunLog, RunLogSink};

/// What a run reports back to whoever triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStatus {
    pub success: bool,
    pub message: String,
    pub records_processed: usize,
    pub inserted: usize,
    /// Pages that contributed nothing because they failed.
    pub failed_pages: Vec<u32>,
    /// Where the run log went, if it could be written.
    pub log_location: Option<String>,
}

impl RunStatus {
    fn completed(report: RunReport) -> Self {
        Self {
            success: true,
            message: format!(
                "Scraper completed: {} records processed, {} new",
                report.summary.attempted, report.summary.inserted
            ),
            records_processed: report.summary.attempted,
            inserted: report.summary.inserted,
            failed_pages: report.failed_pages,
            log_location: report.log_location,
        }
    }

    fn failed(err: &HarvestError) -> Self {
        Self {
            success: false,
            message: format!("Scraper failed: {}", err),
            records_processed: 0,
            inserted: 0,
            failed_pages: Vec::new(),
            log_location: None,
        }
    }
}

/// Result of [`harvest_into`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub summary: PersistSummary,
    pub failed_pages: Vec<u32>,
    pub log_location: Option<String>,
}

/// Run the pipeline, store what it found, then write the run log.
///
/// Only a storage failure is an error. The run log is written after the
/// records are committed and its failure is logged, not returned.
pub async fn harvest_into<F: PageFetcher>(
    pipeline: &Pipeline<F>,
    db: &mut Db,
    sink: &dyn RunLogSink,
) -> Result<RunReport, StorageError> {
    let harvest = pipeline.run().await;
    let failed_pages = harvest.failed_pages();
    if !failed_pages.is_empty() {
        tracing::warn!("Pages with errors: {:?}", failed_pages);
    }

    let summary = if harvest.records.is_empty() {
        tracing::info!("No records scraped.");
        PersistSummary::default()
    } else {
        let summary = db.persist(&harvest.records)?;
        tracing::info!(
            "Stored {} records in database ({} new, {} already present)",
            summary.attempted,
            summary.inserted,
            summary.duplicates()
        );
        summary
    };

    let log_location = record_run(sink, summary.attempted);

    Ok(RunReport {
        summary,
        failed_pages,
        log_location,
    })
}

/// Entry point for one scheduled or manual run. Never fails; the outcome is
/// in the returned status.
pub async fn run_once(config: &Config) -> RunStatus {
    tracing::info!("Starting scraper execution...");
    let status = match run_configured(config).await {
        Ok(report) => RunStatus::completed(report),
        Err(e) => {
            tracing::error!("Unexpected error: {}", e);
            RunStatus::failed(&e)
        }
    };
    tracing::info!("Finished execution.");
    status
}

async fn run_configured(config: &Config) -> Result<RunReport, HarvestError> {
    let query = SearchQuery::new(&config.base_url)?;
    let client = Client::with_options(config.client)?;
    let pipeline = Pipeline::new(client, query, config.pipeline);

    let mut db = Db::open(&config.db_path)?;
    tracing::info!("Connected to SQLite database {}", config.db_path.display());
    db.init()?;

    let sink = FileRunLog::new(&config.log_dir);
    // On error `db` is dropped here, which closes the connection.
    let report = harvest_into(&pipeline, &mut db, &sink).await?;

    match db.close() {
        Ok(()) => tracing::info!("Database connection closed"),
        Err(e) => tracing::warn!("Error closing database: {}", e),
    }
    Ok(report)
}
