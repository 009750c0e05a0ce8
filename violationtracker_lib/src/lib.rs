//! Library layer for the Violation Tracker harvester: page parsing, record
//! normalization, the paginated harvest pipeline, SQLite storage, and run logs.
//!
//! Wraps the `violationtracker_api` fetcher and turns listing pages into
//! deduplicated rows.

pub mod config;
pub mod db;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod run_log;
pub mod runner;
pub mod scrape;

pub use violationtracker_api;
pub use violationtracker_api::{Client, ClientOptions, FetchError, RetryPolicy, SearchQuery};

pub use config::Config;
pub use db::{Db, PersistSummary, StorageError, StoredViolation};
pub use error::HarvestError;
pub use pipeline::{Harvest, PageFetcher, PageOutcome, PageReport, Pipeline, PipelineConfig};
pub use record::{normalize_penalty, ParseError, ViolationRecord};
pub use run_log::{record_run, FileRunLog, LogSinkError, RunLog, RunLogSink};
pub use runner::{harvest_into, run_once, RunReport, RunStatus};
pub use scrape::{parse_page, RawRow, ScrapeError, ScrapePage};
