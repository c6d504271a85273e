//! Text and JSON rendering of records for the CLI.

use chrono::NaiveDate;
use serde::Serialize;

use super::OutputFormat;
use crate::error::Result;
use crate::model::{
    Beneficiary, DistributedEntry, Donor, Item, ReceivedEntry, StockBatch, StockLine,
};

/// A record that can be printed as a row.
pub trait Tabular: Serialize {
    /// Column headers, matching [`Tabular::cells`].
    const HEADERS: &'static [&'static str];

    /// The row's cells, with dates in `date_format`.
    fn cells(&self, date_format: &str) -> Vec<String>;
}

/// Render a list of records.
///
/// Plain output prints one `Header: value` block per record, table output
/// aligns columns under a header, JSON output is a pretty-printed array.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render<T: Tabular>(records: &[T], format: OutputFormat, date_format: &str) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Plain => Ok(records
            .iter()
            .map(|record| plain_block(record, date_format))
            .collect::<Vec<_>>()
            .join("\n\n")),
        OutputFormat::Table => Ok(table(records, date_format)),
    }
}

/// Render a single record; JSON output is an object rather than an array.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_one<T: Tabular>(record: &T, format: OutputFormat, date_format: &str) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Plain | OutputFormat::Table => {
            render(std::slice::from_ref(record), format, date_format)
        }
    }
}

/// Format a quantity with two decimals.
#[must_use]
pub fn quantity(value: f64) -> String {
    format!("{value:.2}")
}

fn date(value: NaiveDate, date_format: &str) -> String {
    value.format(date_format).to_string()
}

fn opt(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn plain_block<T: Tabular>(record: &T, date_format: &str) -> String {
    let width = T::HEADERS.iter().map(|h| h.len()).max().unwrap_or(0);
    T::HEADERS
        .iter()
        .zip(record.cells(date_format))
        .map(|(header, cell)| format!("{:<width$}  {cell}", format!("{header}:"), width = width + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

fn table<T: Tabular>(records: &[T], date_format: &str) -> String {
    let rows: Vec<Vec<String>> = records.iter().map(|r| r.cells(date_format)).collect();
    let mut widths: Vec<usize> = T::HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let headers: Vec<String> = T::HEADERS.iter().map(ToString::to_string).collect();
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();

    let mut out = vec![line(&headers), line(&rule)];
    out.extend(rows.iter().map(|row| line(row)));
    out.join("\n")
}

impl Tabular for Donor {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Phone", "E-mail", "Address"];

    fn cells(&self, _date_format: &str) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.contact.name.clone(),
            opt(self.contact.phone.as_deref()),
            opt(self.contact.email.as_deref()),
            opt(self.contact.address.as_deref()),
        ]
    }
}

impl Tabular for Beneficiary {
    const HEADERS: &'static [&'static str] =
        &["ID", "Name", "Phone", "E-mail", "Address", "Needs"];

    fn cells(&self, _date_format: &str) -> Vec<String> {
        let contact = &self.details.contact;
        let needs = if self.details.needed_foods.is_empty() {
            "-".to_string()
        } else {
            self.details.needed_foods.join(", ")
        };
        vec![
            self.id.to_string(),
            contact.name.clone(),
            opt(contact.phone.as_deref()),
            opt(contact.email.as_deref()),
            opt(contact.address.as_deref()),
            needs,
        ]
    }
}

impl Tabular for Item {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Brand", "Unit"];

    fn cells(&self, _date_format: &str) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.key.name.clone(),
            opt(self.key.brand.as_deref()),
            self.key.unit.clone(),
        ]
    }
}

impl Tabular for ReceivedEntry {
    const HEADERS: &'static [&'static str] = &[
        "ID", "Donor", "Item", "Brand", "Unit", "Quantity", "Received", "Expires",
    ];

    fn cells(&self, date_format: &str) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.donor_name.clone(),
            self.item_name.clone(),
            opt(self.brand.as_deref()),
            self.unit.clone(),
            quantity(self.quantity),
            date(self.received_date, date_format),
            date(self.expiration_date, date_format),
        ]
    }
}

impl Tabular for DistributedEntry {
    const HEADERS: &'static [&'static str] =
        &["ID", "Beneficiary", "Item", "Brand", "Unit", "Quantity", "Date"];

    fn cells(&self, date_format: &str) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.beneficiary_name.clone(),
            self.item_name.clone(),
            opt(self.brand.as_deref()),
            self.unit.clone(),
            quantity(self.quantity),
            date(self.distribution_date, date_format),
        ]
    }
}

impl Tabular for StockLine {
    const HEADERS: &'static [&'static str] = &["Item", "Unit", "Quantity"];

    fn cells(&self, _date_format: &str) -> Vec<String> {
        vec![
            self.item_name.clone(),
            self.unit.clone(),
            quantity(self.total_quantity),
        ]
    }
}

impl Tabular for StockBatch {
    const HEADERS: &'static [&'static str] =
        &["Item ID", "Name", "Brand", "Unit", "Expires", "Remaining"];

    fn cells(&self, date_format: &str) -> Vec<String> {
        vec![
            self.item_id.to_string(),
            self.name.clone(),
            opt(self.brand.as_deref()),
            self.unit.clone(),
            date(self.expiration_date, date_format),
            quantity(self.remaining),
        ]
    }
}
