//! `foodstock` - A ledger for donated food
//!
//! This library records donors, beneficiaries and items, keeps the two
//! donation ledgers (goods received and goods distributed), and derives
//! current stock and expiration alerts from them.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod storage;
pub mod validation;
pub mod watch;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use logging::init_logging;
pub use storage::{Record, Storage, StorageStats};
