//! Derived stock views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stock of every item sharing a (name, unit) pair, across brands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLine {
    /// Item name.
    pub item_name: String,
    /// Unit of measure.
    pub unit: String,
    /// Received minus distributed, summed over all brands.
    pub total_quantity: f64,
}

/// One expiration batch of one item that still has stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockBatch {
    /// Item id.
    pub item_id: i64,
    /// Item name.
    pub name: String,
    /// Item brand.
    pub brand: Option<String>,
    /// Unit of measure.
    pub unit: String,
    /// Expiration date shared by the batch.
    pub expiration_date: NaiveDate,
    /// Batch quantity minus everything distributed for the item.
    ///
    /// Distributions are not tracked per batch, so this is an estimate.
    pub remaining: f64,
}
