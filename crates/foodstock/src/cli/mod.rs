//! Command-line interface for foodstock.
//!
//! This module provides the CLI structure and output rendering for the
//! `foodstock` binary.

mod commands;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AlertsCommand, BeneficiaryArgs, BeneficiaryCommand, ConfigCommand, ContactArgs,
    DistributeCommand, DonorCommand, ItemCommand, ListArgs, LogCommand, OutputFormat,
    ReceiveCommand, ShowArgs, StatusCommand, StockCommand,
};

/// foodstock - Track donated food from arrival to distribution
///
/// Keeps a ledger of donors, beneficiaries and items, records incoming and
/// outgoing donations, reports current stock and warns about batches that
/// are about to expire.
#[derive(Debug, Parser)]
#[command(name = "foodstock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the database file (overrides configuration)
    #[arg(long, global = true, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage donors
    #[command(subcommand)]
    Donor(DonorCommand),

    /// Manage beneficiaries
    #[command(subcommand)]
    Beneficiary(BeneficiaryCommand),

    /// Manage the item catalog
    #[command(subcommand)]
    Item(ItemCommand),

    /// Record an incoming donation
    Receive(ReceiveCommand),

    /// Record a distribution, checking stock first
    Distribute(DistributeCommand),

    /// Show current stock
    Stock(StockCommand),

    /// Show the log of received donations
    Entries(LogCommand),

    /// Show the log of distributions
    Exits(LogCommand),

    /// Show donations about to expire
    Alerts(AlertsCommand),

    /// Show database status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn status_cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            database: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "foodstock");
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;

        assert_eq!(status_cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(status_cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(status_cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(status_cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_donor_add() {
        let args = vec![
            "foodstock",
            "donor",
            "add",
            "Mercado Central",
            "--phone",
            "(11) 3333-4444",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Donor(DonorCommand::Add(contact)) => {
                assert_eq!(contact.name, "Mercado Central");
                assert_eq!(contact.phone.as_deref(), Some("(11) 3333-4444"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_beneficiary_needs() {
        let args = vec![
            "foodstock", "beneficiary", "add", "Familia", "-n", "Arroz", "-n", "Leite",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Beneficiary(BeneficiaryCommand::Add(details)) => {
                assert_eq!(details.needs, vec!["Arroz", "Leite"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_receive() {
        let args = vec![
            "foodstock",
            "receive",
            "--donor",
            "1",
            "--item",
            "Arroz",
            "--brand",
            "Tio Joao",
            "--unit",
            "5kg",
            "--quantity",
            "10",
            "--expires",
            "31/12/2025",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Receive(cmd) => {
                assert_eq!(cmd.donor, 1);
                assert!((cmd.quantity - 10.0).abs() < f64::EPSILON);
                assert_eq!(cmd.expires.to_string(), "2025-12-31");
                assert_eq!(cmd.item_key().brand.as_deref(), Some("Tio Joao"));
                assert!(cmd.on.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_receive_rejects_bad_quantity() {
        let args = vec![
            "foodstock", "receive", "-d", "1", "-i", "Arroz", "-u", "kg", "--quantity", "-2",
            "-e", "2025-12-31",
        ];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_distribute() {
        let args = vec![
            "foodstock", "distribute", "-b", "2", "-i", "Arroz", "--quantity", "4",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Distribute(cmd) => {
                assert_eq!(cmd.beneficiary, 2);
                assert!(cmd.brand.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_stock_item_conflicts_with_batches() {
        let args = vec!["foodstock", "stock", "--item", "3", "--batches"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_alerts() {
        let args = vec!["foodstock", "alerts", "--days", "10", "--watch"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Alerts(cmd) => {
                assert_eq!(cmd.days, Some(10));
                assert!(cmd.watch);
                assert_eq!(cmd.format, OutputFormat::Table);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_list_json() {
        let args = vec!["foodstock", "donor", "list", "--search", "merc", "-f", "json"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Donor(DonorCommand::List(list)) => {
                assert_eq!(list.search.as_deref(), Some("merc"));
                assert_eq!(list.format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_options() {
        let args = vec![
            "foodstock",
            "status",
            "-c",
            "/custom/config.toml",
            "--database",
            "/tmp/food.db",
            "-q",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/food.db")));
        assert!(cli.quiet);
    }

    #[test]
    fn test_parse_with_verbose() {
        let args = vec!["foodstock", "-vv", "entries"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Entries(_)));
    }
}
