//! Donor records.

use rusqlite::{params, Row};
use tracing::debug;

use super::{Record, Storage};
use crate::error::Result;
use crate::model::{Contact, Donor};

impl Record for Donor {
    const TABLE: &'static str = "donors";
    const ENTITY: &'static str = "donor";
    const COLUMNS: &'static str = "id, name, phone, email, address";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            contact: Contact {
                name: row.get(1)?,
                phone: row.get(2)?,
                email: row.get(3)?,
                address: row.get(4)?,
            },
        })
    }
}

impl Storage {
    /// Insert a donor after validating its contact details.
    ///
    /// Returns the assigned id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or a storage error.
    pub fn insert_donor(&self, contact: &Contact) -> Result<i64> {
        let contact = contact.validated()?;
        self.conn.execute(
            "INSERT INTO donors (name, phone, email, address) VALUES (?1, ?2, ?3, ?4)",
            params![contact.name, contact.phone, contact.email, contact.address],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted donor {} ({})", id, contact.name);
        Ok(id)
    }

    /// Replace a donor's details.
    ///
    /// Returns `true` if the donor existed.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or a storage error.
    pub fn update_donor(&self, id: i64, contact: &Contact) -> Result<bool> {
        let contact = contact.validated()?;
        let affected = self.conn.execute(
            "UPDATE donors SET name = ?1, phone = ?2, email = ?3, address = ?4 WHERE id = ?5",
            params![contact.name, contact.phone, contact.email, contact.address, id],
        )?;
        debug!("Updated donor {} ({} row(s))", id, affected);
        Ok(affected > 0)
    }

    /// Find donors whose name contains `term`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn search_donors(&self, term: &str) -> Result<Vec<Donor>> {
        self.search_by_name(term, Donor::name)
    }
}
