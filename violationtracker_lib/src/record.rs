//! Typed violation records and the cell normalization rules that build them.

use serde::{Deserialize, Serialize};

use crate::scrape::RawRow;

/// A field-level failure while converting a scraped row.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("invalid year {0:?}")]
    InvalidYear(String),
    #[error("invalid penalty amount {0:?}")]
    InvalidPenalty(String),
}

/// One normalized violation, ready for storage.
///
/// `(company, year, agency, penalty_amount)` is the natural key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationRecord {
    pub company: String,
    pub current_parent: Option<String>,
    pub current_parent_industry: Option<String>,
    pub primary_offense_type: String,
    pub year: i32,
    pub agency: String,
    pub penalty_amount: f64,
}

impl TryFrom<RawRow> for ViolationRecord {
    type Error = ParseError;

    fn try_from(row: RawRow) -> Result<Self, Self::Error> {
        Ok(Self {
            company: row.company.trim().to_string(),
            current_parent: optional_text(&row.current_parent),
            current_parent_industry: optional_text(&row.current_parent_industry),
            primary_offense_type: row.primary_offense_type.trim().to_string(),
            year: parse_year(&row.year)?,
            agency: row.agency.trim().to_string(),
            penalty_amount: normalize_penalty(&row.penalty)?,
        })
    }
}

/// Trimmed text, or `None` when nothing is left.
fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_year(raw: &str) -> Result<i32, ParseError> {
    raw.trim()
        .parse()
        .map_err(|_| ParseError::InvalidYear(raw.to_string()))
}

/// Parses a penalty cell such as `"$1,250.00"`.
///
/// Strips every `$` and `,`, then parses what is left as a decimal. An empty
/// remainder means no penalty was listed and yields `0.0`. Negative and
/// non-finite values are rejected.
pub fn normalize_penalty(raw: &str) -> Result<f64, ParseError> {
    let cleaned: String = raw.trim().chars().filter(|c| !matches!(c, '$' | ',')).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Ok(0.0);
    }
    match cleaned.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(ParseError::InvalidPenalty(raw.to_string())),
    }
}
