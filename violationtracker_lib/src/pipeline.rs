//! The paginated harvest: fetch, parse and normalize a fixed range of pages.

use std::time::Duration;

use tokio::time::sleep;
use violationtracker_api::{Client, FetchError, SearchQuery};

use crate::record::ViolationRecord;
use crate::scrape::{parse_page, ScrapeError, ScrapePage};

/// Pages harvested per run.
pub const DEFAULT_PAGE_COUNT: u32 = 3;

/// Pause before every page request. The site rate-limits aggressively.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(10);

/// Source of raw page bodies.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;
}

impl PageFetcher for Client {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        Client::fetch_page(self, url).await
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    pub page_count: u32,
    pub page_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            page_count: DEFAULT_PAGE_COUNT,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }
}

/// What happened to one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Scraped { records: usize, skipped_rows: usize },
    /// The page loaded but had no violations table.
    NoTable,
    /// The page was abandoned; it contributed no records.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub page: u32,
    pub outcome: PageOutcome,
}

/// Records from every page that succeeded, in page then row order.
#[derive(Debug, Default)]
pub struct Harvest {
    pub records: Vec<ViolationRecord>,
    pub pages: Vec<PageReport>,
}

impl Harvest {
    pub fn failed_pages(&self) -> Vec<u32> {
        self.pages
            .iter()
            .filter(|p| matches!(p.outcome, PageOutcome::Failed(_)))
            .map(|p| p.page)
            .collect()
    }
}

/// Walks pages `1..=page_count` of a search listing, one at a time.
///
/// A failure on one page (fetch exhausted its retries, or a row could not be
/// normalized) is logged and that page yields nothing; the run carries on
/// with the next page.
pub struct Pipeline<F> {
    fetcher: F,
    query: SearchQuery,
    config: PipelineConfig,
}

impl<F: PageFetcher> Pipeline<F> {
    pub fn new(fetcher: F, query: SearchQuery, config: PipelineConfig) -> Self {
        Self {
            fetcher,
            query,
            config,
        }
    }

    pub async fn run(&self) -> Harvest {
        let mut harvest = Harvest::default();

        for page in 1..=self.config.page_count {
            sleep(self.config.page_delay).await;
            let url = self.query.page_url(page);

            let outcome = match self.scrape_page(url.as_str()).await {
                Ok(scraped) if !scraped.table_found => {
                    tracing::warn!("No table found on page {}", page);
                    PageOutcome::NoTable
                }
                Ok(scraped) => {
                    tracing::info!("Scraped {} records from page {}", scraped.data.len(), page);
                    let outcome = PageOutcome::Scraped {
                        records: scraped.data.len(),
                        skipped_rows: scraped.skipped_rows,
                    };
                    harvest.records.extend(scraped.data);
                    outcome
                }
                Err(e) => {
                    tracing::error!("Error on page {}: {}", page, e);
                    PageOutcome::Failed(e.to_string())
                }
            };

            harvest.pages.push(PageReport { page, outcome });
        }

        harvest
    }

    async fn scrape_page(&self, url: &str) -> Result<ScrapePage<ViolationRecord>, ScrapeError> {
        let html = self.fetcher.fetch_page(url).await?;
        let rows = parse_page(&html);
        let data = rows
            .data
            .into_iter()
            .map(ViolationRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ScrapePage {
            data,
            table_found: rows.table_found,
            skipped_rows: rows.skipped_rows,
        })
    }
}
