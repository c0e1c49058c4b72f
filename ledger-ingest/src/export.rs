//! Write a (categorized) ledger back out as CSV.
//!
//! Columns keep the order and names they were loaded with; `category` is
//! appended last unless the source already had one. Amounts are plain
//! decimals, dates are `YYYY-MM-DD`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use ledger_core::{format_amount, Field, Ledger, Result};
use tracing::info;

use crate::types::CATEGORY_COLUMN;

/// Export the ledger to `path`, replacing any existing file.
pub fn export_ledger(ledger: &Ledger, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_ledger(ledger, file)?;
    info!(rows = ledger.len(), path = %path.display(), "Exported ledger");
    Ok(())
}

/// Write the ledger as CSV to any writer.
pub fn write_ledger<W: Write>(ledger: &Ledger, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);

    let append_category = !ledger.columns().iter().any(|c| c.field == Field::Category);

    let mut header: Vec<&str> = ledger.columns().iter().map(|c| c.name.as_str()).collect();
    if append_category {
        header.push(CATEGORY_COLUMN);
    }
    wtr.write_record(&header).map_err(std::io::Error::from)?;

    for txn in ledger.transactions() {
        let mut row: Vec<String> = ledger
            .columns()
            .iter()
            .map(|col| match col.field {
                Field::Date => txn.date.format("%Y-%m-%d").to_string(),
                Field::Description => txn.description.clone(),
                Field::Deposits => format_amount(txn.deposits),
                Field::Withdrawals => format_amount(txn.withdrawals),
                Field::Balance => format_amount(txn.balance),
                Field::Category => txn.category().unwrap_or_default().to_string(),
                Field::Extra(i) => txn.extra.get(i).cloned().unwrap_or_default(),
            })
            .collect();
        if append_category {
            row.push(txn.category().unwrap_or_default().to_string());
        }
        wtr.write_record(&row).map_err(std::io::Error::from)?;
    }

    wtr.flush()?;
    Ok(())
}
