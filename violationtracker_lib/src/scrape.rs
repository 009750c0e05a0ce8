//! HTML parsing for Violation Tracker listing pages.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::record::ParseError;
use violationtracker_api::FetchError;

/// Number of cells in a listing row.
pub const ROW_CELLS: usize = 7;

static TABLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("table.views-table")
        .expect("BUG: hardcoded selector 'table.views-table' is statically valid")
});

static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("tbody > tr").expect("BUG: hardcoded selector 'tbody > tr' is statically valid")
});

static CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("td").expect("BUG: hardcoded selector 'td' is statically valid")
});

/// Anything that can go wrong while turning one page into records.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// The seven text cells of one listing row, untouched apart from tag removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub company: String,
    pub current_parent: String,
    pub current_parent_industry: String,
    pub primary_offense_type: String,
    pub year: String,
    pub agency: String,
    pub penalty: String,
}

impl RawRow {
    /// Builds a row from cells in column order. Returns `None` when fewer
    /// than seven cells are present; extra cells are ignored.
    pub fn from_cells(cells: Vec<String>) -> Option<Self> {
        if cells.len() < ROW_CELLS {
            return None;
        }
        let mut cells = cells.into_iter();
        Some(Self {
            company: cells.next()?,
            current_parent: cells.next()?,
            current_parent_industry: cells.next()?,
            primary_offense_type: cells.next()?,
            year: cells.next()?,
            agency: cells.next()?,
            penalty: cells.next()?,
        })
    }
}

/// Rows extracted from one page.
#[derive(Debug)]
pub struct ScrapePage<T> {
    pub data: Vec<T>,
    /// `false` when the page had no violations table at all.
    pub table_found: bool,
    /// Rows dropped because they had fewer than seven cells.
    pub skipped_rows: usize,
}

impl<T> Default for ScrapePage<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            table_found: false,
            skipped_rows: 0,
        }
    }
}

/// Extracts the listing rows from a page, in document order.
///
/// Never fails: a page without the `views-table` table yields an empty result
/// with `table_found == false`, and short rows are skipped.
pub fn parse_page(html: &str) -> ScrapePage<RawRow> {
    let document = Html::parse_document(html);

    let Some(table) = document.select(&TABLE_SELECTOR).next() else {
        tracing::warn!("No violations table found in page");
        return ScrapePage::default();
    };

    let mut page = ScrapePage {
        data: Vec::new(),
        table_found: true,
        skipped_rows: 0,
    };

    for (index, row) in table.select(&ROW_SELECTOR).enumerate() {
        let cells: Vec<String> = row.select(&CELL_SELECTOR).map(cell_text).collect();
        let found = cells.len();
        match RawRow::from_cells(cells) {
            Some(raw) => page.data.push(raw),
            None => {
                tracing::warn!(
                    "Skipping row {}: expected {} cells, found {}",
                    index + 1,
                    ROW_CELLS,
                    found
                );
                page.skipped_rows += 1;
            }
        }
    }

    page
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect()
}
