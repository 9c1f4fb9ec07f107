//! CSV export of stored transactions

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use smsledger_core::{to_iso, TransactionRecord};
use std::io::Write;

const HEADER: [&str; 7] = ["Date", "Amount", "Currency", "Type", "Category", "Description", "Sender"];

/// Write `records` as CSV (header row first). Empty input is an error.
pub fn write_csv<W: Write>(records: &[TransactionRecord], writer: W) -> Result<()> {
    if records.is_empty() {
        bail!("no transactions to export");
    }

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;
    for r in records {
        wtr.write_record([
            to_iso(r.date),
            r.amount.to_string(),
            r.currency.clone(),
            r.direction.as_str().to_string(),
            r.category.label().to_string(),
            r.description.clone(),
            r.sender.clone().unwrap_or_default(),
        ])?;
    }
    wtr.flush().context("flush csv")?;
    Ok(())
}

/// `transactions_YYYY-MM-DD.csv`
pub fn export_file_name(today: NaiveDate) -> String {
    format!("transactions_{}.csv", to_iso(today))
}
