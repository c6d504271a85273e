//! Storage layer for foodstock.
//!
//! This module provides `SQLite`-based persistent storage for donors,
//! beneficiaries, items and the two donation ledgers, together with the
//! derived stock and expiration queries.
//!
//! A [`Storage`] owns a single connection for the lifetime of the process.
//! All operations are synchronous.

mod alerts;
mod beneficiaries;
mod donations;
mod donors;
mod items;
mod ledger;
pub mod migrations;
mod recording;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{Beneficiary, DistributedDonation, Donor, Item, ReceivedDonation};
use crate::validation::STORAGE_DATE_FORMAT;

/// A table-backed record type.
///
/// Implemented by every entity so that lookup, listing and deletion can be
/// written once. Inserts and updates stay per entity because their inputs and
/// validation differ.
pub trait Record: Sized {
    /// Table holding the records.
    const TABLE: &'static str;
    /// Entity name used in error messages.
    const ENTITY: &'static str;
    /// Column list matching [`Record::from_row`], `id` first.
    const COLUMNS: &'static str;

    /// Build a record from a row selected with [`Record::COLUMNS`].
    ///
    /// # Errors
    ///
    /// Returns an error if a column has an unexpected type.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Storage engine for the donation ledger.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist,
    /// then creates or upgrades the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a record by its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get<R: Record>(&self, id: i64) -> Result<Option<R>> {
        let sql = format!("SELECT {} FROM {} WHERE id = ?1", R::COLUMNS, R::TABLE);
        let record = self.conn.query_row(&sql, [id], R::from_row).optional()?;
        Ok(record)
    }

    /// Get a record by id, failing when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such record.
    pub fn require<R: Record>(&self, id: i64) -> Result<R> {
        self.get(id)?.ok_or_else(|| Error::not_found(R::ENTITY, id))
    }

    /// List all records of a kind, ascending by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list<R: Record>(&self) -> Result<Vec<R>> {
        let sql = format!("SELECT {} FROM {} ORDER BY id", R::COLUMNS, R::TABLE);
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map([], R::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Delete a record by id.
    ///
    /// Returns `true` if a record was deleted, `false` if not found. Records
    /// still referenced by donations cannot be deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, including foreign
    /// key violations.
    pub fn delete<R: Record>(&self, id: i64) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", R::TABLE);
        let affected = self.conn.execute(&sql, [id])?;
        if affected > 0 {
            debug!("Deleted {} {}", R::ENTITY, id);
        }
        Ok(affected > 0)
    }

    /// Count records of a kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count<R: Record>(&self) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", R::TABLE);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count)
    }

    /// Records whose name contains `term`, ignoring case, ordered by name
    /// then id.
    ///
    /// Matching is done on Unicode lowercase text, so accented names match
    /// and `%` or `_` in the term are literal characters.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub(crate) fn search_by_name<R: Record>(&self, term: &str, name: fn(&R) -> &str) -> Result<Vec<R>> {
        let needle = term.trim().to_lowercase();
        let mut found: Vec<R> = self
            .list::<R>()?
            .into_iter()
            .filter(|record| name(record).to_lowercase().contains(&needle))
            .collect();
        // list() is already ordered by id, and the sort is stable
        found.sort_by(|a, b| name(a).cmp(name(b)));
        Ok(found)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            donors: self.count::<Donor>()?,
            beneficiaries: self.count::<Beneficiary>()?,
            items: self.count::<Item>()?,
            received_donations: self.count::<ReceivedDonation>()?,
            distributed_donations: self.count::<DistributedDonation>()?,
            db_size_bytes,
        })
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StorageStats {
    /// Number of donors.
    pub donors: i64,
    /// Number of beneficiaries.
    pub beneficiaries: i64,
    /// Number of distinct items.
    pub items: i64,
    /// Number of stock entries.
    pub received_donations: i64,
    /// Number of stock exits.
    pub distributed_donations: i64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

/// Today's date in local time.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a date for storage.
pub(crate) fn date_to_sql(date: NaiveDate) -> String {
    date.format(STORAGE_DATE_FORMAT).to_string()
}

/// Read a stored date column.
pub(crate) fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, STORAGE_DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
