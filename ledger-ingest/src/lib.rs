//! ledger-ingest: bank export loading/normalization and annotated CSV export.

pub mod export;
pub mod parsers;
pub mod types;

pub use export::{export_ledger, write_ledger};
pub use parsers::{load_ledger, read_ledger};
