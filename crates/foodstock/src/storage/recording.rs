//! Recording donations as they come in and go out.
//!
//! These are the operations the front end calls. Unlike the raw inserts they
//! resolve items by natural key and guard the stock.

use chrono::NaiveDate;
use tracing::{info, warn};

use super::{today, Storage};
use crate::error::{Error, Result};
use crate::model::{
    Beneficiary, Distribution, DistributionInput, Donor, Receipt, ReceiptInput,
};
use crate::validation;

impl Storage {
    /// Record an incoming donation received today.
    ///
    /// # Errors
    ///
    /// See [`Storage::record_received_on`].
    pub fn record_received(&self, input: &ReceiptInput) -> Result<i64> {
        self.record_received_on(input, today())
    }

    /// Record an incoming donation received on `received_date`.
    ///
    /// The item is looked up by (name, brand, unit) and created on first use.
    /// Returns the id of the new received donation.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, [`Error::NotFound`] for an
    /// unknown donor, or a storage error. Nothing is written on failure.
    pub fn record_received_on(&self, input: &ReceiptInput, received_date: NaiveDate) -> Result<i64> {
        let quantity = validation::quantity(input.quantity)?;
        let key = input.item.validated()?;
        let donor: Donor = self.require(input.donor_id)?;

        let tx = self.conn.unchecked_transaction()?;
        let item_id = self.resolve_item(&key)?;
        let id = self.insert_received(&Receipt {
            donor_id: donor.id,
            item_id,
            quantity,
            received_date,
            expiration_date: input.expiration_date,
        })?;
        tx.commit()?;

        info!(
            "Received {} x {} from {} (expires {})",
            quantity, key, donor.contact.name, input.expiration_date
        );
        Ok(id)
    }

    /// Record a distribution made today.
    ///
    /// # Errors
    ///
    /// See [`Storage::record_distributed_on`].
    pub fn record_distributed(&self, input: &DistributionInput) -> Result<i64> {
        self.record_distributed_on(input, today())
    }

    /// Record a distribution made on `distribution_date`.
    ///
    /// The item is looked up by (name, brand); when several units share the
    /// pair, the oldest item is used. The distribution is rejected when the
    /// item's stock is below the requested quantity.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, [`Error::NotFound`] for an
    /// unknown beneficiary, [`Error::UnknownItem`] when no item matches,
    /// [`Error::InsufficientStock`] when stock is short, or a storage error.
    pub fn record_distributed_on(
        &self,
        input: &DistributionInput,
        distribution_date: NaiveDate,
    ) -> Result<i64> {
        let quantity = validation::quantity(input.quantity)?;
        let name = validation::required("item name", &input.item_name)?;
        let brand = validation::optional(input.brand.as_deref());
        let beneficiary: Beneficiary = self.require(input.beneficiary_id)?;

        let tx = self.conn.unchecked_transaction()?;
        let item = self
            .find_item_by_name_brand(&name, brand.as_deref())?
            .ok_or(Error::UnknownItem { name, brand })?;

        let available = self.stock_for(item.id)?;
        if available < quantity {
            warn!(
                "Rejected distribution of {} x {}: only {} in stock",
                quantity, item.key, available
            );
            return Err(Error::InsufficientStock {
                item: item.key.to_string(),
                available,
                requested: quantity,
            });
        }

        let id = self.insert_distributed(&Distribution {
            beneficiary_id: beneficiary.id,
            item_id: item.id,
            quantity,
            distribution_date,
        })?;
        tx.commit()?;

        info!(
            "Distributed {} x {} to {}",
            quantity,
            item.key,
            beneficiary.name()
        );
        Ok(id)
    }
}
