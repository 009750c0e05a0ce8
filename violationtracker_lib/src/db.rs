//! SQLite storage for harvested violations.

use std::path::Path;

use rusqlite::{params, Connection};
use serde::Serialize;

use crate::record::ViolationRecord;

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Outcome of one [`Db::persist`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistSummary {
    /// Records handed to the store.
    pub attempted: usize,
    /// Records that became new rows; the rest were already present.
    pub inserted: usize,
}

impl PersistSummary {
    pub fn duplicates(&self) -> usize {
        self.attempted - self.inserted
    }
}

/// A violation row as stored, with its id and insertion time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredViolation {
    pub id: i64,
    #[serde(flatten)]
    pub record: ViolationRecord,
    pub created_at: Option<String>,
}

pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Create the `violations` table and its indexes if they are missing.
    pub fn init(&self) -> Result<(), StorageError> {
        let schema = include_str!("../../schema/sqlite.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Insert every record whose natural key is not stored yet.
    ///
    /// Rows matching an existing `(company, year, agency, penalty_amount)`
    /// are skipped without touching the stored row. Any other failure rolls
    /// back the whole batch.
    pub fn persist(&mut self, records: &[ViolationRecord]) -> Result<PersistSummary, StorageError> {
        let tx = self.conn.transaction()?;
        let mut summary = PersistSummary {
            attempted: records.len(),
            inserted: 0,
        };

        {
            let mut stmt = tx.prepare(
                "INSERT INTO violations (
                   company,
                   current_parent,
                   current_parent_industry,
                   primary_offense_type,
                   year,
                   agency,
                   penalty_amount
                 )
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(company, year, agency, penalty_amount) DO NOTHING",
            )?;

            for record in records {
                summary.inserted += stmt.execute(params![
                    record.company,
                    record.current_parent,
                    record.current_parent_industry,
                    record.primary_offense_type,
                    record.year,
                    record.agency,
                    record.penalty_amount,
                ])?;
            }
        }

        tx.commit()?;
        Ok(summary)
    }

    pub fn violation_count(&self) -> Result<i64, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(1) FROM violations", [], |row| row.get(0))?;
        Ok(count)
    }

    /// The first `limit` stored rows in insertion order.
    pub fn list_violations(&self, limit: usize) -> Result<Vec<StoredViolation>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, company, current_parent, current_parent_industry,
                    primary_offense_type, year, agency, penalty_amount, created_at
             FROM violations
             ORDER BY id
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(StoredViolation {
                id: row.get(0)?,
                record: ViolationRecord {
                    company: row.get(1)?,
                    current_parent: row.get(2)?,
                    current_parent_industry: row.get(3)?,
                    primary_offense_type: row.get(4)?,
                    year: row.get(5)?,
                    agency: row.get(6)?,
                    penalty_amount: row.get(7)?,
                },
                created_at: row.get(8)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Close the connection, reporting any error SQLite raises on shutdown.
    pub fn close(self) -> Result<(), StorageError> {
        self.conn.close().map_err(|(_, e)| StorageError::Sqlite(e))
    }
}
