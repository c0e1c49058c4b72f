//! Bank account CSV export parser
//!
//! Expected header (any case, any surrounding whitespace, extra columns allowed):
//!   Date,Description,Deposits,Withdrawals,Balance
//!   20-Aug-2020,Cheque,"582,827.75",0.00,"609,730.09"

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use ledger_core::{fold, parse_amount, Column, Error, Field, Ledger, Result, Transaction};
use tracing::{debug, info, warn};

use crate::types::resolve_columns;

const DATE_FORMATS: &[&str] = &[
    "%d-%b-%Y", // 20-Aug-2020
    "%d-%B-%Y", // 20-August-2020
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%m/%d/%Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a date cell in any of the accepted layouts.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Load and normalize a bank export from disk.
pub fn load_ledger(path: impl AsRef<Path>) -> Result<Ledger> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| Error::load(format!("opening {}: {e}", path.display())))?;
    let ledger = read_ledger(file)
        .map_err(|e| match e {
            Error::Load(msg) => Error::load(format!("{}: {msg}", path.display())),
            other => other,
        })?;
    info!(
        rows = ledger.len(),
        path = %path.display(),
        "Loaded transactions"
    );
    Ok(ledger)
}

/// Parse a bank export from any reader.
///
/// Rows whose date does not parse are dropped. A bad amount fails the whole
/// load, as does a ledger left with no rows.
pub fn read_ledger<R: Read>(reader: R) -> Result<Ledger> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| Error::load(format!("reading header: {e}")))?
        .clone();
    let columns = resolve_columns(headers.iter())?;

    let mut txns = Vec::new();
    let mut dropped = 0usize;

    for result in rdr.records() {
        let record = result.map_err(|e| Error::load(format!("malformed row: {e}")))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        match parse_row(&columns, &record, line)? {
            Some(txn) => txns.push(txn),
            None => {
                dropped += 1;
                warn!(line, "Dropping row with unparseable date");
            }
        }
    }

    debug!(kept = txns.len(), dropped, "Parsed bank export rows");

    if txns.is_empty() {
        return Err(Error::load("no transactions with a valid date"));
    }

    Ok(Ledger::new(columns, txns))
}

/// Returns `Ok(None)` when the row has no usable date.
fn parse_row(columns: &[Column], record: &csv::StringRecord, line: u64) -> Result<Option<Transaction>> {
    let mut date = None;
    let mut description = String::new();
    let mut deposits = 0.0;
    let mut withdrawals = 0.0;
    let mut balance = 0.0;
    let mut category = None;
    let mut extra = Vec::new();

    for (col, value) in columns.iter().zip(record.iter()) {
        let amount = || {
            parse_amount(value)
                .map_err(|reason| Error::load(format!("line {line}, column '{}': {reason}", col.name)))
        };
        match col.field {
            Field::Date => date = parse_date(value),
            Field::Description => description = value.to_string(),
            Field::Deposits => deposits = amount()?,
            Field::Withdrawals => withdrawals = amount()?,
            Field::Balance => balance = amount()?,
            Field::Category => {
                let value = value.trim();
                if !value.is_empty() {
                    category = Some(fold(value));
                }
            }
            Field::Extra(_) => extra.push(value.to_string()),
        }
    }

    Ok(date.map(|date| Transaction {
        date,
        description,
        deposits,
        withdrawals,
        balance,
        category,
        extra,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"Date,Description,Deposits,Withdrawls,Balance
20-Aug-2020,Cheque,"582,827.75",0.00,"609,730.09"
20-Aug-2020,Interest,0.00,"76,216.26","533,513.83"
20-Aug-2020,Cheque,0.00,"177,837.94","355,675.89"
20-Aug-2020,Tax,0.00,"50,810.84","304,865.05"
"#;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_sample_export() {
        let ledger = read_ledger(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ledger.len(), 4);

        let first = &ledger.transactions()[0];
        assert_eq!(first.date, d(2020, 8, 20));
        assert_eq!(first.description, "Cheque");
        assert_eq!(first.deposits, 582827.75);
        assert_eq!(first.withdrawals, 0.0);
        assert_eq!(first.balance, 609730.09);
        assert!(first.category.is_none());

        assert_eq!(ledger.transactions()[3].withdrawals, 50810.84);
    }

    #[test]
    fn test_unparseable_date_drops_only_that_row() {
        let csv = r#"Date,Description,Deposits,Withdrawals,Balance
20-Aug-2020,Cheque,0.00,10.00,100.00
not a date,Broken,0.00,20.00,80.00
,Blank,0.00,30.00,50.00
21-Aug-2020,Tax,0.00,40.00,10.00
"#;
        let ledger = read_ledger(csv.as_bytes()).unwrap();
        let descs: Vec<_> = ledger.transactions().iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descs, vec!["Cheque", "Tax"]);
    }

    #[test]
    fn test_bad_amount_fails_loudly() {
        let csv = "Date,Description,Deposits,Withdrawals,Balance\n20-Aug-2020,Cheque,12.x,0,0\n";
        let err = read_ledger(csv.as_bytes()).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, Error::Load(_)));
        assert!(msg.contains("deposits"));
        assert!(msg.contains("line 2"));
    }

    #[test]
    fn test_all_rows_dropped_is_load_error() {
        let csv = "Date,Description,Deposits,Withdrawals,Balance\nnope,Cheque,0,0,0\n";
        assert!(matches!(read_ledger(csv.as_bytes()), Err(Error::Load(_))));
    }

    #[test]
    fn test_empty_input_is_load_error() {
        assert!(matches!(read_ledger("".as_bytes()), Err(Error::Load(_))));
    }

    #[test]
    fn test_short_row_is_malformed() {
        let csv = "Date,Description,Deposits,Withdrawals,Balance\n20-Aug-2020,Cheque,0\n";
        assert!(matches!(read_ledger(csv.as_bytes()), Err(Error::Load(_))));
    }

    #[test]
    fn test_extra_columns_survive() {
        let csv = "Ref,Date,Description,Deposits,Withdrawals,Balance\nA1,2020-08-20,Tax,0,5,0\n";
        let ledger = read_ledger(csv.as_bytes()).unwrap();
        assert_eq!(ledger.columns()[0].name, "ref");
        assert_eq!(ledger.transactions()[0].extra, vec!["A1".to_string()]);
    }

    #[test]
    fn test_annotated_export_keeps_categories() {
        let csv = "date,description,deposits,withdrawals,balance,category\n\
                   2020-08-20,Tax,0.0,5.0,0.0,tax\n\
                   2020-08-21,Rent,0.0,9.0,0.0,\n";
        let ledger = read_ledger(csv.as_bytes()).unwrap();
        assert_eq!(ledger.transactions()[0].category(), Some("tax"));
        assert_eq!(ledger.transactions()[1].category(), None);
        assert!(ledger.transactions()[0].extra.is_empty());
    }

    #[test]
    fn test_read_back_categories_are_folded() {
        let csv = "date,description,deposits,withdrawals,balance,category\n\
                   2020-08-20,Rent,0.0,5.0,0.0,Housing\n\
                   2020-08-21,Rent,0.0,7.0,0.0, housing \n";
        let ledger = read_ledger(csv.as_bytes()).unwrap();
        let cats: Vec<_> = ledger.transactions().iter().map(|t| t.category()).collect();
        assert_eq!(cats, vec![Some("housing"), Some("housing")]);
    }

    #[test]
    fn test_parse_date_layouts() {
        assert_eq!(parse_date("20-Aug-2020"), Some(d(2020, 8, 20)));
        assert_eq!(parse_date("2020-08-20"), Some(d(2020, 8, 20)));
        assert_eq!(parse_date("Aug 20, 2020"), Some(d(2020, 8, 20)));
        assert_eq!(parse_date("08/20/2020"), Some(d(2020, 8, 20)));
        assert_eq!(parse_date("2020-08-20 13:45:00"), Some(d(2020, 8, 20)));
        assert_eq!(parse_date("32-Aug-2020"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_ledger("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, Error::Load(_)));
        assert!(err.to_string().contains("opening"));
    }
}
