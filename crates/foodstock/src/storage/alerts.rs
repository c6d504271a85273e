//! Expiration alerts.

use chrono::{Days, NaiveDate};
use rusqlite::params;

use super::donations::{received_entry_from_row, RECEIVED_ENTRY_SELECT};
use super::{date_to_sql, today, Storage};
use crate::error::{Error, Result};
use crate::model::ReceivedEntry;

impl Storage {
    /// Received donations expiring in the next `days` days, counted from
    /// today's local date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn expiring_within(&self, days: u32) -> Result<Vec<ReceivedEntry>> {
        self.expiring_within_from(today(), days)
    }

    /// Received donations whose expiration date falls in
    /// `(today, today + days]`, soonest first.
    ///
    /// Batches expiring on `today` or earlier are not reported.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the window runs past the calendar range,
    /// or an error if the database operation fails.
    pub fn expiring_within_from(&self, today: NaiveDate, days: u32) -> Result<Vec<ReceivedEntry>> {
        let until = today
            .checked_add_days(Days::new(u64::from(days)))
            .ok_or_else(|| Error::validation("days", format!("{days} is out of range")))?;

        let mut stmt = self.conn.prepare(&format!(
            r"{RECEIVED_ENTRY_SELECT}
            WHERE date(rd.expiration_date) > date(?1)
              AND date(rd.expiration_date) <= date(?2)
            ORDER BY rd.expiration_date, rd.id
            "
        ))?;
        let entries = stmt
            .query_map(
                params![date_to_sql(today), date_to_sql(until)],
                received_entry_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
