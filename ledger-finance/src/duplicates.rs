//! Duplicate transaction detection

use std::collections::HashMap;

use chrono::NaiveDate;
use ledger_core::{Ledger, Transaction};

/// Rows compare equal when date, deposits, withdrawals and description match.
#[derive(Debug, PartialEq, Eq, Hash)]
struct DuplicateKey<'a> {
    date: NaiveDate,
    deposits: u64,
    withdrawals: u64,
    description: &'a str,
}

impl<'a> DuplicateKey<'a> {
    fn of(txn: &'a Transaction) -> Self {
        Self {
            date: txn.date,
            // + 0.0 folds -0.0 into 0.0
            deposits: (txn.deposits + 0.0).to_bits(),
            withdrawals: (txn.withdrawals + 0.0).to_bits(),
            description: &txn.description,
        }
    }
}

/// Every row that shares its key with at least one other row, in ledger
/// order. All members of a duplicate group are returned, the first
/// occurrence included.
pub fn detect_duplicates(ledger: &Ledger) -> Vec<&Transaction> {
    let mut counts: HashMap<DuplicateKey<'_>, usize> = HashMap::new();
    for txn in ledger.transactions() {
        *counts.entry(DuplicateKey::of(txn)).or_insert(0) += 1;
    }

    ledger
        .transactions()
        .iter()
        .filter(|t| counts.get(&DuplicateKey::of(*t)).copied().unwrap_or(0) > 1)
        .collect()
}
