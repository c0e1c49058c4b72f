//! Session object: one loaded ledger plus the rules and goals built against it.

use std::collections::BTreeMap;
use std::path::Path;

use ledger_core::{Frequency, Ledger, Result, Transaction};
use ledger_ingest::{export_ledger, load_ledger};
use tracing::debug;

use crate::aggregate::{self, CategoryAmount, PeriodSpend, PeriodTable};
use crate::budget::{self, GoalReport, GoalSet};
use crate::category_rules::RuleSet;
use crate::duplicates;

/// Holds the transaction set for a session along with its keyword rules,
/// budget goals and the most recent baseline budget.
///
/// Mutating calls take `&mut self`; share across threads behind a lock.
#[derive(Debug, Clone)]
pub struct BudgetTracker {
    ledger: Ledger,
    rules: RuleSet,
    goals: GoalSet,
    baseline: Option<BTreeMap<String, f64>>,
}

impl BudgetTracker {
    /// Load and normalize a bank export.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_ledger(load_ledger(path)?))
    }

    pub fn from_ledger(ledger: Ledger) -> Self {
        Self {
            ledger,
            rules: RuleSet::new(),
            goals: GoalSet::new(),
            baseline: None,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn goals(&self) -> &GoalSet {
        &self.goals
    }

    /// Baseline from the last `generate_baseline_budget` call
    pub fn baseline(&self) -> Option<&BTreeMap<String, f64>> {
        self.baseline.as_ref()
    }

    pub fn apply_rule(&mut self, category: &str, keyword: &str) -> &RuleSet {
        self.rules.apply_rule(category, keyword);
        debug!(category, keyword, "Registered rule");
        &self.rules
    }

    pub fn categorize(&mut self) -> Result<()> {
        self.rules.categorize(&mut self.ledger)
    }

    /// Keep categories read back from the file; rows without one become
    /// `miscellaneous`.
    pub fn fill_missing_categories(&mut self) -> usize {
        let filled = self.ledger.fill_uncategorized();
        debug!(filled, "Filled rows without a category");
        filled
    }

    pub fn totals_by_category(&self) -> Result<Vec<CategoryAmount>> {
        aggregate::totals_by_category(&self.ledger)
    }

    pub fn totals_by_category_and_period(&self, frequency: Frequency) -> Result<PeriodTable> {
        aggregate::totals_by_category_and_period(&self.ledger, frequency)
    }

    pub fn totals_for_period(&self, frequency: Frequency, period_index: usize) -> Result<PeriodSpend> {
        aggregate::totals_for_period(&self.ledger, frequency, period_index)
    }

    pub fn averages_by_period(&self, frequency: Frequency) -> Result<Vec<CategoryAmount>> {
        aggregate::averages_by_period(&self.ledger, frequency)
    }

    /// Compute, store and return the baseline budget.
    pub fn generate_baseline_budget(&mut self, frequency: Frequency) -> Result<BTreeMap<String, f64>> {
        let baseline = budget::baseline_budget(&self.ledger, frequency)?;
        self.baseline = Some(baseline.clone());
        Ok(baseline)
    }

    pub fn add_goal(&mut self, category: &str, amount: f64) {
        self.goals.add_goal(category, amount);
    }

    pub fn compare_to_goals(&self, frequency: Frequency, period_index: usize) -> Result<GoalReport> {
        budget::compare_to_goals(&self.ledger, &self.goals, frequency, period_index)
    }

    pub fn detect_duplicates(&self) -> Vec<&Transaction> {
        duplicates::detect_duplicates(&self.ledger)
    }

    pub fn export_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        export_ledger(&self.ledger, path)
    }
}
