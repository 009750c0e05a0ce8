//! Run-completion logs: one small JSON document per harvest.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const FILE_PREFIX: &str = "execution-";

#[derive(thiserror::Error, Debug)]
pub enum LogSinkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Completion record for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLog {
    pub timestamp: DateTime<Utc>,
    /// Records handed to storage in the run, duplicates included.
    pub records_processed: usize,
}

impl RunLog {
    pub fn new(records_processed: usize) -> Self {
        Self {
            timestamp: Utc::now(),
            records_processed,
        }
    }

    /// Object name for this log, unique per second.
    pub fn file_name(&self) -> String {
        format!(
            "{}{}.json",
            FILE_PREFIX,
            self.timestamp.format("%Y%m%d%H%M%S")
        )
    }
}

/// Durable destination for run logs.
pub trait RunLogSink {
    /// Persist `log`, returning where it was written.
    fn write(&self, log: &RunLog) -> Result<String, LogSinkError>;
}

/// Writes run logs as pretty JSON files in a directory.
pub struct FileRunLog {
    dir: PathBuf,
}

impl FileRunLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Log file names in the directory, oldest first.
    pub fn list(&self) -> Result<Vec<String>, LogSinkError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if name.starts_with(FILE_PREFIX) && name.ends_with(".json") {
                names.push(name);
            }
        }
        // Timestamps are fixed-width, so lexical order is chronological.
        names.sort();
        Ok(names)
    }

    /// The most recent log, if any were written.
    pub fn latest(&self) -> Result<Option<(String, RunLog)>, LogSinkError> {
        let Some(name) = self.list()?.pop() else {
            return Ok(None);
        };
        let contents = fs::read_to_string(self.dir.join(&name))?;
        let log = serde_json::from_str(&contents)?;
        Ok(Some((name, log)))
    }
}

impl RunLogSink for FileRunLog {
    fn write(&self, log: &RunLog) -> Result<String, LogSinkError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(log.file_name());
        let json = serde_json::to_string_pretty(log)?;
        fs::write(&path, json)?;
        Ok(path.display().to_string())
    }
}

/// Write a run log for `records_processed` records. Failures are logged and
/// swallowed: a missing run log never fails a harvest.
pub fn record_run(sink: &dyn RunLogSink, records_processed: usize) -> Option<String> {
    let log = RunLog::new(records_processed);
    match sink.write(&log) {
        Ok(location) => {
            tracing::info!("Saved log to {}", location);
            Some(location)
        }
        Err(e) => {
            tracing::error!("Error saving run log: {}", e);
            None
        }
    }
}
