//! Plain-text rendering of analyzer results

use std::collections::BTreeMap;
use std::fmt::Write;

use ledger_core::Transaction;
use ledger_finance::budget::title_case;
use ledger_finance::{CategoryAmount, GoalReport, PeriodTable};

pub fn category_amounts(items: &[CategoryAmount]) -> String {
    let width = items
        .iter()
        .map(|i| i.category.chars().count())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for item in items {
        let _ = writeln!(
            out,
            "{:<width$}  ${:>14.2}",
            title_case(&item.category),
            item.amount
        );
    }
    out
}

pub fn baseline(budget: &BTreeMap<String, f64>) -> String {
    let items: Vec<CategoryAmount> = budget
        .iter()
        .map(|(c, a)| CategoryAmount::new(c.clone(), *a))
        .collect();
    category_amounts(&items)
}

/// One line per period, one column per category.
pub fn period_table(table: &PeriodTable) -> String {
    let mut out = String::new();
    let headers: Vec<String> = table.categories.iter().map(|c| title_case(c)).collect();
    let widths: Vec<usize> = headers.iter().map(|h| h.chars().count().max(12)).collect();

    let _ = write!(out, "{:<24}", "period");
    for (h, &w) in headers.iter().zip(&widths) {
        let _ = write!(out, "  {h:>w$}");
    }
    out.push('\n');

    for row in &table.rows {
        let _ = write!(out, "{:<24}", row.period.to_string());
        for (v, &w) in row.totals.iter().zip(&widths) {
            let _ = write!(out, "  {v:>w$.2}");
        }
        out.push('\n');
    }
    out
}

pub fn goal_report(report: &GoalReport) -> String {
    let mut out = format!("Period: {}\n", report.period);
    for c in &report.comparisons {
        out.push_str(&c.render());
        out.push('\n');
    }
    out
}

pub fn transactions(txns: &[&Transaction]) -> String {
    let mut out = String::new();
    for t in txns {
        let _ = writeln!(
            out,
            "{}  {:<30}  +{:>12.2}  -{:>12.2}  {:>14.2}  {}",
            t.date,
            t.description,
            t.deposits,
            t.withdrawals,
            t.balance,
            t.category().unwrap_or("-")
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ledger_core::{Frequency, Period};
    use ledger_finance::{BudgetStatus, Comparison, PeriodRow};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 8, day).unwrap()
    }

    #[test]
    fn test_category_amounts_title_cased() {
        let out = category_amounts(&[
            CategoryAmount::new("tax", 50810.84),
            CategoryAmount::new("housing", 177837.94),
        ]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Tax"));
        assert!(lines[1].contains("177837.94"));
    }

    #[test]
    fn test_period_table_layout() {
        let table = PeriodTable {
            frequency: Frequency::Biweekly,
            categories: vec!["housing".into(), "tax".into()],
            rows: vec![PeriodRow {
                period: Period {
                    start: d(10),
                    end: d(23),
                },
                totals: vec![177837.94, 0.0],
            }],
        };
        let out = period_table(&table);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("Housing"));
        assert!(lines[1].starts_with("2020-08-10 to 2020-08-23"));
        assert!(lines[1].contains("177837.94"));
        assert!(lines[1].trim_end().ends_with("0.00"));
    }

    #[test]
    fn test_goal_report_lines() {
        let report = GoalReport {
            period: Period {
                start: d(10),
                end: d(23),
            },
            comparisons: vec![
                Comparison::Compared {
                    category: "housing".into(),
                    actual: 177837.94,
                    goal: 500000.0,
                    difference: 177837.94 - 500000.0,
                    status: BudgetStatus::Under,
                },
                Comparison::NoGoalSet {
                    category: "interest".into(),
                },
            ],
        };
        let out = goal_report(&report);
        assert!(out.contains("Housing | Actual: $177837.94 Goal: $500000.00 | Difference: $322162.06 under budget"));
        assert!(out.contains("No goal set for Interest"));
    }
}
