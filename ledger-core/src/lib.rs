//! ledger-core: transaction types, calendar periods and money handling
//! shared by the ledger analyzer crates

pub mod error;
pub mod money;
pub mod period;
pub mod transaction;

pub use error::{Error, Result};
pub use money::{format_amount, parse_amount};
pub use period::{Frequency, Period, PeriodBinner};
pub use transaction::{fold, Column, Field, Ledger, Transaction, MISCELLANEOUS};
