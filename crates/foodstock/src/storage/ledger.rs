//! Stock derived from the two donation ledgers.
//!
//! Nothing here is stored: every figure is recomputed from
//! `received_donations` minus `distributed_donations`.

use std::collections::{BTreeMap, BTreeSet};

use rusqlite::params;

use super::{date_column, Storage};
use crate::error::Result;
use crate::model::{StockBatch, StockLine};

impl Storage {
    /// Current stock of one item: everything received minus everything
    /// distributed. Items with no rows have a stock of zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stock_for(&self, item_id: i64) -> Result<f64> {
        let stock: f64 = self.conn.query_row(
            r"
            SELECT
                (SELECT COALESCE(SUM(quantity), 0.0) FROM received_donations WHERE item_id = ?1)
              - (SELECT COALESCE(SUM(quantity), 0.0) FROM distributed_donations WHERE item_id = ?1)
            ",
            params![item_id],
            |row| row.get(0),
        )?;
        Ok(stock)
    }

    /// Stock per (name, unit), merged across brands.
    ///
    /// Only lines with a positive total are returned, ordered by name then
    /// unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn grouped_stock(&self) -> Result<Vec<StockLine>> {
        let mut totals: BTreeMap<(String, String), f64> = BTreeMap::new();

        for (table, sign) in [("received_donations", 1.0), ("distributed_donations", -1.0)] {
            let sql = format!(
                r"
                SELECT i.name, i.unit, SUM(t.quantity)
                FROM {table} t
                JOIN items i ON t.item_id = i.id
                GROUP BY i.name, i.unit
                "
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, f64>(2)?))
            })?;
            for row in rows {
                let (name, unit, sum) = row?;
                *totals.entry((name, unit)).or_insert(0.0) += sign * sum;
            }
        }

        Ok(totals
            .into_iter()
            .filter(|(_, total)| *total > 0.0)
            .map(|((item_name, unit), total_quantity)| StockLine {
                item_name,
                unit,
                total_quantity,
            })
            .collect())
    }

    /// Every (item, expiration date) batch that still has stock.
    ///
    /// A batch's remaining quantity is what it received minus everything
    /// ever distributed for the item, since distributions do not name a
    /// batch. Ordered by name, brand, then soonest expiration.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stock_items_with_batches(&self) -> Result<Vec<StockBatch>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT
                i.id,
                i.name,
                i.brand,
                i.unit,
                rd.expiration_date,
                SUM(rd.quantity) - COALESCE(
                    (SELECT SUM(dd.quantity) FROM distributed_donations dd WHERE dd.item_id = i.id),
                    0.0
                ) AS remaining
            FROM items i
            JOIN received_donations rd ON rd.item_id = i.id
            GROUP BY i.id, rd.expiration_date
            HAVING remaining > 0
            ORDER BY i.name, COALESCE(i.brand, ''), rd.expiration_date, i.id
            ",
        )?;
        let batches = stmt
            .query_map([], |row| {
                Ok(StockBatch {
                    item_id: row.get(0)?,
                    name: row.get(1)?,
                    brand: row.get(2)?,
                    unit: row.get(3)?,
                    expiration_date: date_column(row, 4)?,
                    remaining: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(batches)
    }

    /// Distinct names of items that currently have stock, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stocked_item_names(&self) -> Result<Vec<String>> {
        let names: BTreeSet<String> = self
            .stock_items_with_batches()?
            .into_iter()
            .map(|batch| batch.name)
            .collect();
        Ok(names.into_iter().collect())
    }

    /// Distinct brands in stock for an item name, sorted.
    ///
    /// Unbranded stock has no entry here; it is distributed by leaving the
    /// brand out.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stocked_brands(&self, name: &str) -> Result<Vec<String>> {
        let name = name.trim();
        let brands: BTreeSet<String> = self
            .stock_items_with_batches()?
            .into_iter()
            .filter(|batch| batch.name == name)
            .filter_map(|batch| batch.brand)
            .collect();
        Ok(brands.into_iter().collect())
    }

    /// The soonest-expiring batch in stock of the item a distribution of
    /// (name, brand) would draw from.
    ///
    /// The item is resolved as [`Storage::record_distributed`] resolves it,
    /// so when several units share the pair only the oldest item's batches
    /// are considered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn batch_for(&self, name: &str, brand: Option<&str>) -> Result<Option<StockBatch>> {
        let Some(item) = self.find_item_by_name_brand(name, brand)? else {
            return Ok(None);
        };
        let batch = self
            .stock_items_with_batches()?
            .into_iter()
            .filter(|batch| batch.item_id == item.id)
            .min_by_key(|batch| batch.expiration_date);
        Ok(batch)
    }
}
