//! Budget goals, baseline budgets and goal comparison

use std::collections::BTreeMap;
use std::fmt;

use ledger_core::{fold, Frequency, Ledger, Period, Result};
use serde::Serialize;

use crate::aggregate::{averages_by_period, totals_for_period};

/// Per-category target amounts, keyed by folded category name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoalSet {
    goals: BTreeMap<String, f64>,
}

impl GoalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite the goal for `category`.
    pub fn add_goal(&mut self, category: &str, amount: f64) {
        self.goals.insert(fold(category), amount);
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.goals.get(&fold(category)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.goals.iter().map(|(c, a)| (c.as_str(), *a))
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }
}

/// Average spend per period for each category, as non-negative amounts.
pub fn baseline_budget(ledger: &Ledger, frequency: Frequency) -> Result<BTreeMap<String, f64>> {
    Ok(averages_by_period(ledger, frequency)?
        .into_iter()
        .map(|avg| (avg.category, avg.amount.abs()))
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Over,
    Under,
    Exact,
}

impl BudgetStatus {
    fn from_difference(difference: f64) -> Self {
        if difference > 0.0 {
            BudgetStatus::Over
        } else if difference < 0.0 {
            BudgetStatus::Under
        } else {
            BudgetStatus::Exact
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            BudgetStatus::Over => "over budget",
            BudgetStatus::Under => "under budget",
            BudgetStatus::Exact => "on budget",
        }
    }
}

/// Outcome for one category in the compared period
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Comparison {
    Compared {
        category: String,
        actual: f64,
        goal: f64,
        /// `actual - goal`
        difference: f64,
        status: BudgetStatus,
    },
    NoGoalSet {
        category: String,
    },
}

impl Comparison {
    pub fn category(&self) -> &str {
        match self {
            Comparison::Compared { category, .. } | Comparison::NoGoalSet { category } => category,
        }
    }

    /// One human-readable report line.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::Compared {
                category,
                actual,
                goal,
                difference,
                status,
            } => write!(
                f,
                "{} | Actual: ${:.2} Goal: ${:.2} | Difference: ${:.2} {}",
                title_case(category),
                actual,
                goal,
                difference.abs(),
                status.describe()
            ),
            Comparison::NoGoalSet { category } => {
                write!(f, "No goal set for {}", title_case(category))
            }
        }
    }
}

/// Comparison of one period's spend against the goal set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalReport {
    pub period: Period,
    pub comparisons: Vec<Comparison>,
}

/// Compare spend in the `period_index`-th most recent period with `goals`.
///
/// Categories with zero spend in that period are left out.
pub fn compare_to_goals(
    ledger: &Ledger,
    goals: &GoalSet,
    frequency: Frequency,
    period_index: usize,
) -> Result<GoalReport> {
    let spend = totals_for_period(ledger, frequency, period_index)?;

    let comparisons = spend
        .totals
        .into_iter()
        .filter(|t| t.amount != 0.0)
        .map(|t| match goals.get(&t.category) {
            Some(goal) => {
                let difference = t.amount - goal;
                Comparison::Compared {
                    category: t.category,
                    actual: t.amount,
                    goal,
                    difference,
                    status: BudgetStatus::from_difference(difference),
                }
            }
            None => Comparison::NoGoalSet {
                category: t.category,
            },
        })
        .collect();

    Ok(GoalReport {
        period: spend.period,
        comparisons,
    })
}

/// Capitalize the first letter of each word, lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
