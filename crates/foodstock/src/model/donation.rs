//! Stock entries (received donations) and stock exits (distributions).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::item::ItemKey;

/// Payload of a received donation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Donor who gave the goods.
    pub donor_id: i64,
    /// Item received.
    pub item_id: i64,
    /// Quantity received, in the item's unit.
    pub quantity: f64,
    /// Day the donation arrived.
    pub received_date: NaiveDate,
    /// Day the batch expires.
    pub expiration_date: NaiveDate,
}

/// A stored received donation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivedDonation {
    /// Database id.
    pub id: i64,
    /// Row contents.
    #[serde(flatten)]
    pub receipt: Receipt,
}

/// Payload of a distributed donation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    /// Beneficiary who received the goods.
    pub beneficiary_id: i64,
    /// Item handed out.
    pub item_id: i64,
    /// Quantity handed out.
    pub quantity: f64,
    /// Day of the distribution.
    pub distribution_date: NaiveDate,
}

/// A stored distributed donation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributedDonation {
    /// Database id.
    pub id: i64,
    /// Row contents.
    #[serde(flatten)]
    pub distribution: Distribution,
}

/// Request to record an incoming donation.
///
/// The item is named by its natural key and created on first use.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptInput {
    /// Donor giving the goods.
    pub donor_id: i64,
    /// Item being received.
    pub item: ItemKey,
    /// Quantity received.
    pub quantity: f64,
    /// Expiration date of this batch.
    pub expiration_date: NaiveDate,
}

/// Request to record an outgoing distribution.
///
/// The item is named by (name, brand); its unit is whatever was received.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionInput {
    /// Beneficiary receiving the goods.
    pub beneficiary_id: i64,
    /// Item name.
    pub item_name: String,
    /// Item brand.
    pub brand: Option<String>,
    /// Quantity to hand out.
    pub quantity: f64,
}

/// A received donation joined with its donor and item, as shown in the
/// entries log and the expiration alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivedEntry {
    /// Received donation id.
    pub id: i64,
    /// Donor name.
    pub donor_name: String,
    /// Item name.
    pub item_name: String,
    /// Item brand.
    pub brand: Option<String>,
    /// Item unit.
    pub unit: String,
    /// Quantity received.
    pub quantity: f64,
    /// Day the donation arrived.
    pub received_date: NaiveDate,
    /// Day the batch expires.
    pub expiration_date: NaiveDate,
}

impl ReceivedEntry {
    /// Days from `today` until this batch expires (negative once expired).
    #[must_use]
    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        (self.expiration_date - today).num_days()
    }
}

/// A distributed donation joined with its beneficiary and item, as shown in
/// the exits log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributedEntry {
    /// Distributed donation id.
    pub id: i64,
    /// Beneficiary name.
    pub beneficiary_name: String,
    /// Item name.
    pub item_name: String,
    /// Item brand.
    pub brand: Option<String>,
    /// Item unit.
    pub unit: String,
    /// Quantity handed out.
    pub quantity: f64,
    /// Day of the distribution.
    pub distribution_date: NaiveDate,
}
