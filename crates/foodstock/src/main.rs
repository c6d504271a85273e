//! `foodstock` - CLI for the food donation ledger
//!
//! This binary records donations received and distributed, and reports
//! stock and expiration alerts from the local database.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;

use foodstock::cli::render::{self, render, render_one};
use foodstock::cli::{
    AlertsCommand, BeneficiaryCommand, Cli, Command, ConfigCommand, DistributeCommand,
    DonorCommand, ItemCommand, ReceiveCommand, StockCommand,
};
use foodstock::model::{Beneficiary, DistributionInput, Donor, Item, ReceiptInput};
use foodstock::{init_logging, watch, Config, Storage};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        // Configuration commands never touch the database
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        command => {
            let db_path = cli.database.unwrap_or_else(|| config.database_path());
            let storage = Storage::open(&db_path)
                .with_context(|| format!("opening database {}", db_path.display()))?;
            run(&storage, &config, command)
        }
    }
}

fn run(storage: &Storage, config: &Config, command: Command) -> Result<()> {
    let dates = config.display.date_format.as_str();
    match command {
        Command::Donor(cmd) => handle_donor(storage, cmd, dates),
        Command::Beneficiary(cmd) => handle_beneficiary(storage, cmd, dates),
        Command::Item(cmd) => handle_item(storage, cmd, dates),
        Command::Receive(cmd) => handle_receive(storage, &cmd),
        Command::Distribute(cmd) => handle_distribute(storage, &cmd, dates),
        Command::Stock(cmd) => handle_stock(storage, &cmd, dates),
        Command::Entries(cmd) => {
            println!("{}", render(&storage.received_entries()?, cmd.format, dates)?);
            Ok(())
        }
        Command::Exits(cmd) => {
            println!("{}", render(&storage.distributed_entries()?, cmd.format, dates)?);
            Ok(())
        }
        Command::Alerts(cmd) => handle_alerts(storage, config, &cmd),
        Command::Status(cmd) => handle_status(storage, config, cmd.json),
        Command::Config(cmd) => handle_config(config, cmd),
    }
}

fn handle_donor(storage: &Storage, cmd: DonorCommand, dates: &str) -> Result<()> {
    match cmd {
        DonorCommand::Add(contact) => {
            let id = storage.insert_donor(&contact.to_contact())?;
            println!("Added donor {id}");
        }
        DonorCommand::List(list) => {
            let donors = match list.search {
                Some(term) => storage.search_donors(&term)?,
                None => storage.list::<Donor>()?,
            };
            println!("{}", render(&donors, list.format, dates)?);
        }
        DonorCommand::Show(show) => {
            let donor: Donor = storage.require(show.id)?;
            println!("{}", render_one(&donor, show.format, dates)?);
        }
        DonorCommand::Update { id, contact } => {
            if !storage.update_donor(id, &contact.to_contact())? {
                anyhow::bail!("donor {id} not found");
            }
            println!("Updated donor {id}");
        }
        DonorCommand::Delete { id } => {
            if !storage
                .delete::<Donor>(id)
                .with_context(|| format!("deleting donor {id}"))?
            {
                anyhow::bail!("donor {id} not found");
            }
            println!("Deleted donor {id}");
        }
    }
    Ok(())
}

fn handle_beneficiary(storage: &Storage, cmd: BeneficiaryCommand, dates: &str) -> Result<()> {
    match cmd {
        BeneficiaryCommand::Add(details) => {
            let id = storage.insert_beneficiary(&details.to_beneficiary())?;
            println!("Added beneficiary {id}");
        }
        BeneficiaryCommand::List(list) => {
            let beneficiaries = match list.search {
                Some(term) => storage.search_beneficiaries(&term)?,
                None => storage.list::<Beneficiary>()?,
            };
            println!("{}", render(&beneficiaries, list.format, dates)?);
        }
        BeneficiaryCommand::Show(show) => {
            let beneficiary: Beneficiary = storage.require(show.id)?;
            println!("{}", render_one(&beneficiary, show.format, dates)?);
        }
        BeneficiaryCommand::Update { id, details } => {
            if !storage.update_beneficiary(id, &details.to_beneficiary())? {
                anyhow::bail!("beneficiary {id} not found");
            }
            println!("Updated beneficiary {id}");
        }
        BeneficiaryCommand::Delete { id } => {
            if !storage
                .delete::<Beneficiary>(id)
                .with_context(|| format!("deleting beneficiary {id}"))?
            {
                anyhow::bail!("beneficiary {id} not found");
            }
            println!("Deleted beneficiary {id}");
        }
    }
    Ok(())
}

fn handle_item(storage: &Storage, cmd: ItemCommand, dates: &str) -> Result<()> {
    match cmd {
        ItemCommand::List { format } => {
            println!("{}", render(&storage.list::<Item>()?, format, dates)?);
        }
        ItemCommand::Show(show) => {
            let item: Item = storage.require(show.id)?;
            println!("{}", render_one(&item, show.format, dates)?);
            println!("In stock: {}", render::quantity(storage.stock_for(item.id)?));
        }
        ItemCommand::Names => {
            for name in storage.item_names()? {
                println!("{name}");
            }
        }
        ItemCommand::Brands => {
            for brand in storage.item_brands()? {
                println!("{brand}");
            }
        }
        ItemCommand::Stocked { name } => {
            let values = match name {
                Some(name) => storage.stocked_brands(&name)?,
                None => storage.stocked_item_names()?,
            };
            for value in values {
                println!("{value}");
            }
        }
        ItemCommand::Update {
            id,
            name,
            brand,
            unit,
        } => {
            let key = foodstock::model::ItemKey::new(name, brand.as_deref(), unit);
            if !storage.update_item(id, &key)? {
                anyhow::bail!("item {id} not found");
            }
            println!("Updated item {id}");
        }
        ItemCommand::Delete { id } => {
            if !storage
                .delete::<Item>(id)
                .with_context(|| format!("deleting item {id}"))?
            {
                anyhow::bail!("item {id} not found");
            }
            println!("Deleted item {id}");
        }
    }
    Ok(())
}

fn handle_receive(storage: &Storage, cmd: &ReceiveCommand) -> Result<()> {
    let input = ReceiptInput {
        donor_id: cmd.donor,
        item: cmd.item_key(),
        quantity: cmd.quantity,
        expiration_date: cmd.expires,
    };
    let id = match cmd.on {
        Some(date) => storage.record_received_on(&input, date)?,
        None => storage.record_received(&input)?,
    };
    println!("Recorded received donation {id}");
    Ok(())
}

fn handle_distribute(storage: &Storage, cmd: &DistributeCommand, dates: &str) -> Result<()> {
    // Looked up before recording, while the drawn batch still has stock
    let batch = storage.batch_for(&cmd.item, cmd.brand.as_deref())?;

    let input = DistributionInput {
        beneficiary_id: cmd.beneficiary,
        item_name: cmd.item.clone(),
        brand: cmd.brand.clone(),
        quantity: cmd.quantity,
    };
    let id = match cmd.on {
        Some(date) => storage.record_distributed_on(&input, date)?,
        None => storage.record_distributed(&input)?,
    };
    println!("Recorded distribution {id}");
    if let Some(batch) = batch {
        println!(
            "  Unit: {}, soonest expiration: {}",
            batch.unit,
            batch.expiration_date.format(dates)
        );
    }
    Ok(())
}

fn handle_stock(storage: &Storage, cmd: &StockCommand, dates: &str) -> Result<()> {
    if let Some(item_id) = cmd.item {
        let item: Item = storage.require(item_id)?;
        println!("{}: {}", item.key, render::quantity(storage.stock_for(item_id)?));
    } else if cmd.batches {
        let batches = storage.stock_items_with_batches()?;
        println!("{}", render(&batches, cmd.format, dates)?);
    } else {
        println!("{}", render(&storage.grouped_stock()?, cmd.format, dates)?);
    }
    Ok(())
}

fn handle_alerts(storage: &Storage, config: &Config, cmd: &AlertsCommand) -> Result<()> {
    let days = cmd.days.unwrap_or(config.alerts.lookahead_days);
    let dates = config.display.date_format.as_str();

    if !cmd.watch {
        let entries = storage.expiring_within(days)?;
        println!("{}", render(&entries, cmd.format, dates)?);
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting alert refresh timer")?;

    let format = cmd.format;
    let refreshes = runtime.block_on(watch::watch_alerts(
        storage,
        days,
        config.refresh_interval(),
        |entries| {
            println!(
                "Expiring within {days} days (as of {}):",
                foodstock::storage::today().format(dates)
            );
            println!("{}", render(entries, format, dates)?);
            println!();
            Ok(())
        },
        async {
            // An error here means no handler could be installed; stop immediately
            let _ = tokio::signal::ctrl_c().await;
        },
    ))?;

    tracing::debug!("Alert watch ended after {} refreshes", refreshes);
    Ok(())
}

fn handle_status(storage: &Storage, config: &Config, json: bool) -> Result<()> {
    let stats = storage.stats()?;
    let expiring = storage.expiring_within(config.alerts.lookahead_days)?.len();

    if json {
        let status = serde_json::json!({
            "database_path": storage.path(),
            "stats": stats,
            "lookahead_days": config.alerts.lookahead_days,
            "expiring": expiring,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("foodstock status");
        println!("----------------");
        println!("Database:        {}", storage.path().display());
        println!("Size:            {} bytes", stats.db_size_bytes);
        println!("Donors:          {}", stats.donors);
        println!("Beneficiaries:   {}", stats.beneficiaries);
        println!("Items:           {}", stats.items);
        println!("Received:        {}", stats.received_donations);
        println!("Distributed:     {}", stats.distributed_donations);
        println!(
            "Expiring ({:>2}d):  {}",
            config.alerts.lookahead_days, expiring
        );
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Alerts]");
                println!("  Lookahead (days):   {}", config.alerts.lookahead_days);
                println!(
                    "  Refresh (seconds):  {}",
                    config.alerts.refresh_interval_secs
                );
                println!();
                println!("[Display]");
                println!("  Date format:        {}", config.display.date_format);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
