//! Keyword rules mapping transaction descriptions to user categories.
//!
//! A description matches a keyword only when the two are equal after
//! lower-casing; there is no substring search. Categories are tried in the
//! order they were first registered and the first hit wins.

use std::collections::BTreeSet;

use ledger_core::{fold, Ledger, Result, MISCELLANEOUS};
use tracing::debug;

/// One category and the exact descriptions that select it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub category: String,
    pub keywords: BTreeSet<String>,
}

/// Ordered keyword rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `keyword` under `category`. Both are case-folded; applying
    /// the same pair twice has no further effect.
    pub fn apply_rule(&mut self, category: &str, keyword: &str) {
        let category = fold(category);
        let keyword = fold(keyword);

        match self.rules.iter_mut().find(|r| r.category == category) {
            Some(rule) => {
                rule.keywords.insert(keyword);
            }
            None => self.rules.push(Rule {
                category,
                keywords: BTreeSet::from([keyword]),
            }),
        }
    }

    /// First category whose keywords contain the folded description.
    pub fn match_category(&self, description: &str) -> Option<&str> {
        let desc = fold(description);
        self.rules
            .iter()
            .find(|r| r.keywords.contains(&desc))
            .map(|r| r.category.as_str())
    }

    /// Category for a description, falling back to `miscellaneous`.
    pub fn categorize_description(&self, description: &str) -> &str {
        self.match_category(description).unwrap_or(MISCELLANEOUS)
    }

    /// Categories in registration order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.category.as_str())
    }

    pub fn keywords(&self, category: &str) -> Option<&BTreeSet<String>> {
        let category = fold(category);
        self.rules
            .iter()
            .find(|r| r.category == category)
            .map(|r| &r.keywords)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Assign a category to every row of the ledger.
    ///
    /// All categories are computed before any row is touched, so the ledger
    /// is either fully re-categorized or left as it was.
    pub fn categorize(&self, ledger: &mut Ledger) -> Result<()> {
        let categories: Vec<String> = ledger
            .transactions()
            .iter()
            .map(|t| self.categorize_description(&t.description).to_string())
            .collect();

        let unmatched = categories.iter().filter(|c| *c == MISCELLANEOUS).count();
        debug!(
            rows = categories.len(),
            unmatched,
            rules = self.rules.len(),
            "Categorized ledger"
        );

        ledger.assign_categories(categories)
    }
}
