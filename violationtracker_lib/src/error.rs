//! Error types for the library layer.

use std::fmt;

use violationtracker_api::FetchError;

use crate::db::StorageError;

/// Errors that abort a whole harvest run.
///
/// Page-level failures never show up here; the pipeline absorbs them.
#[derive(Debug)]
pub enum HarvestError {
    /// The fetcher could not be set up (bad base URL, TLS backend failure).
    Setup(FetchError),
    /// The database could not be opened, initialized, or written.
    Storage(StorageError),
}

impl fmt::Display for HarvestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup(e) => write!(f, "Setup error: {}", e),
            Self::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for HarvestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Setup(e) => Some(e),
            Self::Storage(e) => Some(e),
        }
    }
}

impl From<FetchError> for HarvestError {
    fn from(e: FetchError) -> Self {
        Self::Setup(e)
    }
}

impl From<StorageError> for HarvestError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}
