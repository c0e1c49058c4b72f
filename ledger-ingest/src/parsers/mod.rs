//! Delimited bank-export parsers

pub mod bank_csv;

pub use bank_csv::{load_ledger, parse_date, read_ledger};
