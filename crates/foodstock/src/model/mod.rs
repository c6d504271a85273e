//! Core record types for foodstock.
//!
//! Entities carry their database id next to a payload struct that is also
//! used as the input for inserts and updates. All records serialize with
//! their fields in declaration order, which is the order reports print them.

mod donation;
mod item;
mod party;
mod stock;

pub use donation::{
    DistributedDonation, DistributedEntry, Distribution, DistributionInput, Receipt, ReceiptInput,
    ReceivedDonation, ReceivedEntry,
};
pub use item::{Item, ItemKey};
pub use party::{Beneficiary, Contact, Donor, NewBeneficiary, MAX_NEEDED_FOODS};
pub use stock::{StockBatch, StockLine};
