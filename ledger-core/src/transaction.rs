//! Transaction records and the in-memory ledger they live in

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Category assigned when no keyword rule matches
pub const MISCELLANEOUS: &str = "miscellaneous";

/// Canonical form of a category name or keyword.
pub fn fold(s: &str) -> String {
    s.to_lowercase()
}

/// One row of a bank export
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    /// Money in
    pub deposits: f64,
    /// Money out, the figure every spend report sums
    pub withdrawals: f64,
    /// Running balance as printed by the bank
    pub balance: f64,
    /// Unset until the ledger is categorized
    pub category: Option<String>,
    /// Values of non-standard columns, in header order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<String>,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        deposits: f64,
        withdrawals: f64,
        balance: f64,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            deposits,
            withdrawals,
            balance,
            category: None,
            extra: Vec::new(),
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Returns true if money left the account on this row
    pub fn is_spend(&self) -> bool {
        self.withdrawals != 0.0
    }
}

/// Which transaction field a ledger column carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Date,
    Description,
    Deposits,
    Withdrawals,
    Balance,
    /// Present when the source was itself an annotated export
    Category,
    /// Index into `Transaction::extra`
    Extra(usize),
}

/// A column as it appeared in the source header (trimmed, lower-cased)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub field: Field,
}

impl Column {
    pub fn new(name: impl Into<String>, field: Field) -> Self {
        Self {
            name: name.into(),
            field,
        }
    }
}

/// The transaction set of one session plus its source column layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    columns: Vec<Column>,
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new(columns: Vec<Column>, transactions: Vec<Transaction>) -> Self {
        Self {
            columns,
            transactions,
        }
    }

    /// Build a ledger with the standard five-column layout.
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        Self::new(Self::standard_columns(), transactions)
    }

    pub fn standard_columns() -> Vec<Column> {
        vec![
            Column::new("date", Field::Date),
            Column::new("description", Field::Description),
            Column::new("deposits", Field::Deposits),
            Column::new("withdrawals", Field::Withdrawals),
            Column::new("balance", Field::Balance),
        ]
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// True once every row carries a category.
    pub fn is_categorized(&self) -> bool {
        self.transactions.iter().all(|t| t.category.is_some())
    }

    /// Fail with a validation error unless the ledger has been categorized.
    pub fn require_categorized(&self) -> Result<()> {
        if self.is_categorized() {
            Ok(())
        } else {
            Err(Error::validation(
                "Data must include 'date' and 'category' columns; run categorize() first",
            ))
        }
    }

    /// Overwrite every row's category in one step.
    ///
    /// `categories` must hold exactly one entry per row; on mismatch nothing
    /// is written.
    pub fn assign_categories(&mut self, categories: Vec<String>) -> Result<()> {
        if categories.len() != self.transactions.len() {
            return Err(Error::validation(format!(
                "expected {} categories, got {}",
                self.transactions.len(),
                categories.len()
            )));
        }
        for (txn, category) in self.transactions.iter_mut().zip(categories) {
            txn.category = Some(category);
        }
        Ok(())
    }

    /// Set rows without a category to `miscellaneous`, leaving the rest.
    /// Returns how many rows were filled.
    pub fn fill_uncategorized(&mut self) -> usize {
        let mut filled = 0;
        for txn in self.transactions.iter_mut().filter(|t| t.category.is_none()) {
            txn.category = Some(MISCELLANEOUS.to_string());
            filled += 1;
        }
        filled
    }

    /// Append a row. Used to build fixtures and merge exports.
    pub fn push(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }
}
