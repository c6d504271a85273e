//! Received and distributed donation rows, and the entries/exits logs.
//!
//! The inserts and updates here are the administrative path: they validate
//! the row but do not consult stock. Normal recording goes through
//! `record_received` and `record_distributed`.

use rusqlite::{params, Row};
use tracing::debug;

use super::{date_column, date_to_sql, Record, Storage};
use crate::error::Result;
use crate::model::{
    DistributedDonation, DistributedEntry, Distribution, Receipt, ReceivedDonation, ReceivedEntry,
};
use crate::validation;

/// Received donations joined with donor and item. Callers append filters.
pub(crate) const RECEIVED_ENTRY_SELECT: &str = r"
SELECT
    rd.id,
    d.name,
    i.name,
    i.brand,
    i.unit,
    rd.quantity,
    rd.received_date,
    rd.expiration_date
FROM received_donations rd
JOIN donors d ON rd.donor_id = d.id
JOIN items i ON rd.item_id = i.id
";

pub(crate) fn received_entry_from_row(row: &Row<'_>) -> rusqlite::Result<ReceivedEntry> {
    Ok(ReceivedEntry {
        id: row.get(0)?,
        donor_name: row.get(1)?,
        item_name: row.get(2)?,
        brand: row.get(3)?,
        unit: row.get(4)?,
        quantity: row.get(5)?,
        received_date: date_column(row, 6)?,
        expiration_date: date_column(row, 7)?,
    })
}

impl Record for ReceivedDonation {
    const TABLE: &'static str = "received_donations";
    const ENTITY: &'static str = "received donation";
    const COLUMNS: &'static str =
        "id, donor_id, item_id, quantity, received_date, expiration_date";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            receipt: Receipt {
                donor_id: row.get(1)?,
                item_id: row.get(2)?,
                quantity: row.get(3)?,
                received_date: date_column(row, 4)?,
                expiration_date: date_column(row, 5)?,
            },
        })
    }
}

impl Record for DistributedDonation {
    const TABLE: &'static str = "distributed_donations";
    const ENTITY: &'static str = "distributed donation";
    const COLUMNS: &'static str = "id, beneficiary_id, item_id, quantity, distribution_date";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            distribution: Distribution {
                beneficiary_id: row.get(1)?,
                item_id: row.get(2)?,
                quantity: row.get(3)?,
                distribution_date: date_column(row, 4)?,
            },
        })
    }
}

impl Storage {
    /// Insert a received donation row.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive quantity, or a storage
    /// error (including unknown donor or item ids).
    pub fn insert_received(&self, receipt: &Receipt) -> Result<i64> {
        let quantity = validation::quantity(receipt.quantity)?;
        self.conn.execute(
            r"
            INSERT INTO received_donations
                (donor_id, item_id, quantity, received_date, expiration_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![
                receipt.donor_id,
                receipt.item_id,
                quantity,
                date_to_sql(receipt.received_date),
                date_to_sql(receipt.expiration_date),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted received donation {}", id);
        Ok(id)
    }

    /// Replace a received donation row.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive quantity, or a storage error.
    pub fn update_received(&self, id: i64, receipt: &Receipt) -> Result<bool> {
        let quantity = validation::quantity(receipt.quantity)?;
        let affected = self.conn.execute(
            r"
            UPDATE received_donations
            SET donor_id = ?1, item_id = ?2, quantity = ?3,
                received_date = ?4, expiration_date = ?5
            WHERE id = ?6
            ",
            params![
                receipt.donor_id,
                receipt.item_id,
                quantity,
                date_to_sql(receipt.received_date),
                date_to_sql(receipt.expiration_date),
                id,
            ],
        )?;
        debug!("Updated received donation {} ({} row(s))", id, affected);
        Ok(affected > 0)
    }

    /// Insert a distributed donation row without checking stock.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive quantity, or a storage error.
    pub fn insert_distributed(&self, distribution: &Distribution) -> Result<i64> {
        let quantity = validation::quantity(distribution.quantity)?;
        self.conn.execute(
            r"
            INSERT INTO distributed_donations
                (beneficiary_id, item_id, quantity, distribution_date)
            VALUES (?1, ?2, ?3, ?4)
            ",
            params![
                distribution.beneficiary_id,
                distribution.item_id,
                quantity,
                date_to_sql(distribution.distribution_date),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted distributed donation {}", id);
        Ok(id)
    }

    /// Replace a distributed donation row without checking stock.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive quantity, or a storage error.
    pub fn update_distributed(&self, id: i64, distribution: &Distribution) -> Result<bool> {
        let quantity = validation::quantity(distribution.quantity)?;
        let affected = self.conn.execute(
            r"
            UPDATE distributed_donations
            SET beneficiary_id = ?1, item_id = ?2, quantity = ?3, distribution_date = ?4
            WHERE id = ?5
            ",
            params![
                distribution.beneficiary_id,
                distribution.item_id,
                quantity,
                date_to_sql(distribution.distribution_date),
                id,
            ],
        )?;
        debug!("Updated distributed donation {} ({} row(s))", id, affected);
        Ok(affected > 0)
    }

    /// The entries log: every received donation with donor and item details.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn received_entries(&self) -> Result<Vec<ReceivedEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECEIVED_ENTRY_SELECT} ORDER BY rd.id"))?;
        let entries = stmt
            .query_map([], received_entry_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// The exits log: every distribution with beneficiary and item details.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn distributed_entries(&self) -> Result<Vec<DistributedEntry>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT
                dd.id,
                b.name,
                i.name,
                i.brand,
                i.unit,
                dd.quantity,
                dd.distribution_date
            FROM distributed_donations dd
            JOIN beneficiaries b ON dd.beneficiary_id = b.id
            JOIN items i ON dd.item_id = i.id
            ORDER BY dd.id
            ",
        )?;
        let entries = stmt
            .query_map([], |row| {
                Ok(DistributedEntry {
                    id: row.get(0)?,
                    beneficiary_name: row.get(1)?,
                    item_name: row.get(2)?,
                    brand: row.get(3)?,
                    unit: row.get(4)?,
                    quantity: row.get(5)?,
                    distribution_date: date_column(row, 6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
