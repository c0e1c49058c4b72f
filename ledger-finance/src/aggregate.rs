//! Spend aggregation by category and calendar period.
//!
//! Every figure here is a sum of `withdrawals`. All functions are read-only
//! and require a categorized ledger.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use ledger_core::{Error, Frequency, Ledger, Period, PeriodBinner, Result};
use serde::Serialize;
use tracing::debug;

/// A category and an amount (total, mean or budget)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: f64,
}

impl CategoryAmount {
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        Self {
            category: category.into(),
            amount,
        }
    }
}

/// Ascending by amount; equal amounts fall back to category name.
fn sort_ascending(items: &mut [CategoryAmount]) {
    items.sort_by(|a, b| {
        a.amount
            .total_cmp(&b.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
}

/// One row of a period table: the period and one total per table category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodRow {
    pub period: Period,
    pub totals: Vec<f64>,
}

impl PeriodRow {
    pub fn total(&self) -> f64 {
        self.totals.iter().sum()
    }
}

/// Withdrawals per (period, category), periods ascending, categories by name.
///
/// Only periods containing at least one transaction get a row. Cells for
/// categories with no spend in a period are zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTable {
    pub frequency: Frequency,
    pub categories: Vec<String>,
    pub rows: Vec<PeriodRow>,
}

impl PeriodTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell for the period starting on `start`
    pub fn cell(&self, start: NaiveDate, category: &str) -> Option<f64> {
        let col = self.categories.iter().position(|c| c == category)?;
        self.rows
            .iter()
            .find(|r| r.period.start == start)
            .map(|r| r.totals[col])
    }

    /// The `period_index`-th most recent row; 1 is the latest period.
    pub fn recent(&self, period_index: usize) -> Result<PeriodSpend> {
        if period_index == 0 || period_index > self.rows.len() {
            return Err(Error::Range {
                requested: period_index,
                available: self.rows.len(),
            });
        }
        let row = &self.rows[self.rows.len() - period_index];
        Ok(PeriodSpend {
            period: row.period,
            totals: self
                .categories
                .iter()
                .zip(&row.totals)
                .map(|(c, t)| CategoryAmount::new(c.clone(), *t))
                .collect(),
        })
    }

    /// Mean of each category column over all rows, ascending.
    pub fn column_means(&self) -> Vec<CategoryAmount> {
        if self.rows.is_empty() {
            return Vec::new();
        }
        let n = self.rows.len() as f64;
        let mut means: Vec<CategoryAmount> = self
            .categories
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let sum: f64 = self.rows.iter().map(|r| r.totals[i]).sum();
                CategoryAmount::new(c.clone(), sum / n)
            })
            .collect();
        sort_ascending(&mut means);
        means
    }
}

/// Spend by category within a single period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSpend {
    pub period: Period,
    /// Every table category, in name order, zero included
    pub totals: Vec<CategoryAmount>,
}

impl PeriodSpend {
    pub fn get(&self, category: &str) -> Option<f64> {
        self.totals
            .iter()
            .find(|t| t.category == category)
            .map(|t| t.amount)
    }
}

/// Total withdrawals per category, ascending by total.
pub fn totals_by_category(ledger: &Ledger) -> Result<Vec<CategoryAmount>> {
    ledger.require_categorized()?;

    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for txn in ledger.transactions() {
        if let Some(cat) = txn.category() {
            *sums.entry(cat).or_insert(0.0) += txn.withdrawals;
        }
    }

    let mut totals: Vec<CategoryAmount> = sums
        .into_iter()
        .map(|(c, t)| CategoryAmount::new(c, t))
        .collect();
    sort_ascending(&mut totals);
    Ok(totals)
}

/// Bucket transactions into periods of `frequency` and sum withdrawals per
/// category within each.
pub fn totals_by_category_and_period(ledger: &Ledger, frequency: Frequency) -> Result<PeriodTable> {
    ledger.require_categorized()?;

    let Some(earliest) = ledger.transactions().iter().map(|t| t.date).min() else {
        return Ok(PeriodTable {
            frequency,
            categories: Vec::new(),
            rows: Vec::new(),
        });
    };
    let binner = PeriodBinner::new(frequency, earliest);

    let mut categories: BTreeSet<&str> = BTreeSet::new();
    let mut cells: BTreeMap<Period, BTreeMap<&str, f64>> = BTreeMap::new();
    for txn in ledger.transactions() {
        let Some(cat) = txn.category() else { continue };
        categories.insert(cat);
        *cells
            .entry(binner.period_of(txn.date))
            .or_default()
            .entry(cat)
            .or_insert(0.0) += txn.withdrawals;
    }

    let rows: Vec<PeriodRow> = cells
        .into_iter()
        .map(|(period, by_cat)| PeriodRow {
            period,
            totals: categories
                .iter()
                .map(|c| by_cat.get(c).copied().unwrap_or(0.0))
                .collect(),
        })
        .collect();

    debug!(
        frequency = %frequency,
        periods = rows.len(),
        categories = categories.len(),
        "Built period table"
    );

    Ok(PeriodTable {
        frequency,
        categories: categories.into_iter().map(String::from).collect(),
        rows,
    })
}

/// Spend by category in the `period_index`-th most recent period.
pub fn totals_for_period(
    ledger: &Ledger,
    frequency: Frequency,
    period_index: usize,
) -> Result<PeriodSpend> {
    totals_by_category_and_period(ledger, frequency)?.recent(period_index)
}

/// Mean spend per period for each category, ascending.
pub fn averages_by_period(ledger: &Ledger, frequency: Frequency) -> Result<Vec<CategoryAmount>> {
    Ok(totals_by_category_and_period(ledger, frequency)?.column_means())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::Transaction;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn txn(date: NaiveDate, category: &str, withdrawals: f64) -> Transaction {
        let mut t = Transaction::new(date, category, 0.0, withdrawals, 0.0);
        t.category = Some(category.to_string());
        t
    }

    /// Three biweekly bins: Aug 10-23, Aug 24-Sep 6, Sep 7-20 (2020)
    fn sample() -> Ledger {
        Ledger::from_transactions(vec![
            txn(d(2020, 8, 20), "housing", 100.0),
            txn(d(2020, 8, 21), "tax", 40.0),
            txn(d(2020, 8, 25), "housing", 50.0),
            txn(d(2020, 9, 6), "housing", 25.0),
            txn(d(2020, 9, 10), "food", 12.5),
            txn(d(2020, 9, 11), "housing", 0.0),
        ])
    }

    #[test]
    fn test_uncategorized_ledger_rejected() {
        let ledger = Ledger::from_transactions(vec![Transaction::new(d(2020, 8, 20), "x", 0.0, 1.0, 0.0)]);
        assert!(matches!(totals_by_category(&ledger), Err(Error::Validation(_))));
        assert!(matches!(
            totals_by_category_and_period(&ledger, Frequency::Weekly),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_totals_by_category_ascending() {
        let totals = totals_by_category(&sample()).unwrap();
        let names: Vec<_> = totals.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(names, vec!["food", "tax", "housing"]);
        assert_eq!(totals[2].amount, 175.0);
    }

    #[test]
    fn test_biweekly_table_cells() {
        let table = totals_by_category_and_period(&sample(), Frequency::Biweekly).unwrap();
        assert_eq!(table.categories, vec!["food", "housing", "tax"]);
        assert_eq!(table.len(), 3);

        assert_eq!(table.rows[0].period.start, d(2020, 8, 10));
        assert_eq!(table.cell(d(2020, 8, 10), "housing"), Some(100.0));
        assert_eq!(table.cell(d(2020, 8, 10), "tax"), Some(40.0));
        assert_eq!(table.cell(d(2020, 8, 10), "food"), Some(0.0));
        assert_eq!(table.cell(d(2020, 8, 24), "housing"), Some(75.0));
        assert_eq!(table.cell(d(2020, 9, 7), "food"), Some(12.5));
        assert_eq!(table.cell(d(2020, 9, 7), "missing"), None);
    }

    #[test]
    fn test_row_sums_match_period_withdrawals() {
        let ledger = sample();
        for freq in [
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Biweekly,
            Frequency::Monthly,
            Frequency::Quarterly,
            Frequency::Yearly,
        ] {
            let table = totals_by_category_and_period(&ledger, freq).unwrap();
            for row in &table.rows {
                let expected: f64 = ledger
                    .transactions()
                    .iter()
                    .filter(|t| row.period.contains(t.date))
                    .map(|t| t.withdrawals)
                    .sum();
                assert!((row.total() - expected).abs() < 1e-9, "{freq} {}", row.period);
            }
            let grand: f64 = table.rows.iter().map(|r| r.total()).sum();
            assert!((grand - 227.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_periods_are_skipped() {
        let ledger = Ledger::from_transactions(vec![
            txn(d(2020, 1, 15), "tax", 1.0),
            txn(d(2020, 6, 15), "tax", 2.0),
        ]);
        let table = totals_by_category_and_period(&ledger, Frequency::Monthly).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1].period.start, d(2020, 6, 1));
    }

    #[test]
    fn test_recent_period_is_last_row() {
        let ledger = sample();
        let table = totals_by_category_and_period(&ledger, Frequency::Biweekly).unwrap();
        let latest = totals_for_period(&ledger, Frequency::Biweekly, 1).unwrap();
        let last = table.rows.last().unwrap();
        assert_eq!(latest.period, last.period);
        assert_eq!(
            latest.totals.iter().map(|t| t.amount).collect::<Vec<_>>(),
            last.totals
        );

        let oldest = totals_for_period(&ledger, Frequency::Biweekly, 3).unwrap();
        assert_eq!(oldest.get("tax"), Some(40.0));
    }

    #[test]
    fn test_period_index_out_of_range() {
        let ledger = sample();
        let err = totals_for_period(&ledger, Frequency::Biweekly, 4).unwrap_err();
        assert!(matches!(
            err,
            Error::Range {
                requested: 4,
                available: 3
            }
        ));
        assert!(matches!(
            totals_for_period(&ledger, Frequency::Biweekly, 0),
            Err(Error::Range { .. })
        ));
    }

    #[test]
    fn test_averages_across_periods() {
        let avgs = averages_by_period(&sample(), Frequency::Biweekly).unwrap();
        let get = |c: &str| avgs.iter().find(|a| a.category == c).unwrap().amount;
        assert!((get("housing") - 175.0 / 3.0).abs() < 1e-9);
        assert!((get("tax") - 40.0 / 3.0).abs() < 1e-9);
        assert!((get("food") - 12.5 / 3.0).abs() < 1e-9);
        for w in avgs.windows(2) {
            assert!(w[0].amount <= w[1].amount);
        }
    }
}
