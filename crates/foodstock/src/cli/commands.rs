//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::model::{Contact, ItemKey, NewBeneficiary};
use crate::validation;

/// Donor management commands.
#[derive(Debug, Subcommand)]
pub enum DonorCommand {
    /// Register a donor
    Add(ContactArgs),

    /// List donors
    List(ListArgs),

    /// Show one donor
    Show(ShowArgs),

    /// Replace a donor's details
    Update {
        /// Donor id
        id: i64,

        /// New details
        #[command(flatten)]
        contact: ContactArgs,
    },

    /// Delete a donor with no recorded donations
    Delete {
        /// Donor id
        id: i64,
    },
}

/// Beneficiary management commands.
#[derive(Debug, Subcommand)]
pub enum BeneficiaryCommand {
    /// Register a beneficiary
    Add(BeneficiaryArgs),

    /// List beneficiaries
    List(ListArgs),

    /// Show one beneficiary
    Show(ShowArgs),

    /// Replace a beneficiary's details
    Update {
        /// Beneficiary id
        id: i64,

        /// New details
        #[command(flatten)]
        details: BeneficiaryArgs,
    },

    /// Delete a beneficiary with no recorded distributions
    Delete {
        /// Beneficiary id
        id: i64,
    },
}

/// Item catalog commands.
#[derive(Debug, Subcommand)]
pub enum ItemCommand {
    /// List items
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one item
    Show(ShowArgs),

    /// List known item names
    Names,

    /// List known brands
    Brands,

    /// List item names in stock, or the brands in stock for one name
    Stocked {
        /// Item name whose brands to list
        name: Option<String>,
    },

    /// Rename an item or change its brand or unit
    Update {
        /// Item id
        id: i64,

        /// Item name
        name: String,

        /// Brand
        #[arg(short, long)]
        brand: Option<String>,

        /// Unit of measure
        #[arg(short, long)]
        unit: String,
    },

    /// Delete an item with no recorded donations
    Delete {
        /// Item id
        id: i64,
    },
}

/// Name and contact details of a donor or beneficiary.
#[derive(Debug, Clone, Args)]
pub struct ContactArgs {
    /// Full name
    pub name: String,

    /// Phone number, e.g. "(11) 98765-4321"
    #[arg(short, long)]
    pub phone: Option<String>,

    /// E-mail address
    #[arg(short, long)]
    pub email: Option<String>,

    /// Postal address
    #[arg(short, long)]
    pub address: Option<String>,
}

impl ContactArgs {
    /// Build the contact record; validation happens in storage.
    #[must_use]
    pub fn to_contact(&self) -> Contact {
        Contact {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
        }
    }
}

/// Beneficiary details.
#[derive(Debug, Clone, Args)]
pub struct BeneficiaryArgs {
    /// Name and contact details
    #[command(flatten)]
    pub contact: ContactArgs,

    /// A food the household needs (repeat up to three times)
    #[arg(short, long = "needs", value_name = "FOOD")]
    pub needs: Vec<String>,
}

impl BeneficiaryArgs {
    /// Build the beneficiary record; validation happens in storage.
    #[must_use]
    pub fn to_beneficiary(&self) -> NewBeneficiary {
        NewBeneficiary {
            contact: self.contact.to_contact(),
            needed_foods: self.needs.clone(),
        }
    }
}

/// Arguments for listing donors or beneficiaries.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show names containing this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for showing a single record.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Record id
    pub id: i64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Receive command arguments.
#[derive(Debug, Args)]
pub struct ReceiveCommand {
    /// Donor id
    #[arg(short, long)]
    pub donor: i64,

    /// Item name
    #[arg(short, long)]
    pub item: String,

    /// Brand
    #[arg(short, long)]
    pub brand: Option<String>,

    /// Unit of measure, e.g. "5kg"
    #[arg(short, long)]
    pub unit: String,

    /// Quantity received
    #[arg(long, value_parser = parse_quantity)]
    pub quantity: f64,

    /// Expiration date (DD/MM/YYYY or YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date)]
    pub expires: NaiveDate,

    /// Date received, if not today
    #[arg(long, value_parser = parse_date)]
    pub on: Option<NaiveDate>,
}

impl ReceiveCommand {
    /// The item being received.
    #[must_use]
    pub fn item_key(&self) -> ItemKey {
        ItemKey::new(self.item.clone(), self.brand.as_deref(), self.unit.clone())
    }
}

/// Distribute command arguments.
#[derive(Debug, Args)]
pub struct DistributeCommand {
    /// Beneficiary id
    #[arg(short, long)]
    pub beneficiary: i64,

    /// Item name
    #[arg(short, long)]
    pub item: String,

    /// Brand (leave out for unbranded stock)
    #[arg(short = 'B', long)]
    pub brand: Option<String>,

    /// Quantity to hand out
    #[arg(long, value_parser = parse_quantity)]
    pub quantity: f64,

    /// Distribution date, if not today
    #[arg(long, value_parser = parse_date)]
    pub on: Option<NaiveDate>,
}

/// Stock command arguments.
#[derive(Debug, Args)]
pub struct StockCommand {
    /// Show the stock of a single item
    #[arg(short, long, value_name = "ID", conflicts_with = "batches")]
    pub item: Option<i64>,

    /// Show every batch still in stock, by expiration date
    #[arg(short, long)]
    pub batches: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Alerts command arguments.
#[derive(Debug, Args)]
pub struct AlertsCommand {
    /// Days ahead to look (defaults to the configured lookahead)
    #[arg(short, long)]
    pub days: Option<u32>,

    /// Keep refreshing until interrupted
    #[arg(short, long)]
    pub watch: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the entries and exits logs.
#[derive(Debug, Args)]
pub struct LogCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

fn parse_quantity(text: &str) -> Result<f64, String> {
    validation::parse_quantity(text).map_err(|e| e.to_string())
}

fn parse_date(text: &str) -> Result<NaiveDate, String> {
    validation::parse_date(text).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_contact_args_to_contact() {
        let args = ContactArgs {
            name: "Maria".to_string(),
            phone: Some("(11) 98765-4321".to_string()),
            email: None,
            address: None,
        };
        let contact = args.to_contact();
        assert_eq!(contact.name, "Maria");
        assert_eq!(contact.phone.as_deref(), Some("(11) 98765-4321"));
    }

    #[test]
    fn test_beneficiary_args_keep_needs() {
        let args = BeneficiaryArgs {
            contact: ContactArgs {
                name: "Familia".to_string(),
                phone: None,
                email: None,
                address: None,
            },
            needs: vec!["Arroz".to_string(), "Leite".to_string()],
        };
        assert_eq!(args.to_beneficiary().needed_foods.len(), 2);
    }

    #[test]
    fn test_parse_quantity_arg() {
        assert_eq!(parse_quantity("2.5"), Ok(2.5));
        assert!(parse_quantity("zero").unwrap_err().contains("quantity"));
    }

    #[test]
    fn test_parse_date_arg() {
        assert_eq!(
            parse_date("01/02/2026"),
            Ok(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap())
        );
        assert!(parse_date("2026/02/01").is_err());
    }
}
