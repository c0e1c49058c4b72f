//! ledger-finance: keyword categorization, period aggregation, budget goals
//! and duplicate detection over a loaded ledger

pub mod aggregate;
pub mod budget;
pub mod category_rules;
pub mod duplicates;
pub mod tracker;

pub use aggregate::{CategoryAmount, PeriodRow, PeriodSpend, PeriodTable};
pub use budget::{BudgetStatus, Comparison, GoalReport, GoalSet};
pub use category_rules::RuleSet;
pub use duplicates::detect_duplicates;
pub use tracker::BudgetTracker;
