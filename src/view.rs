//! Search and category filtering of the transaction list for display.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::domain::Transaction;

/// Sentinel accepted by [`CategoryFilter::from_str`] for "no filter".
pub const ALL_CATEGORIES: &str = "All";

/// Category selector applied to the transaction list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Exact, case-sensitive match on the transaction's category name.
    Named(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => category == name,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(CategoryFilter::from(value))
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(value.to_string())
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Named(name) => f.write_str(name),
        }
    }
}

/// Search text plus category selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    pub search: String,
    pub category: CategoryFilter,
}

impl TransactionQuery {
    pub fn new(search: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search: search.into(),
            category,
        }
    }

    pub fn search(search: impl Into<String>) -> Self {
        Self::new(search, CategoryFilter::All)
    }

    pub fn category(name: &str) -> Self {
        Self::new("", CategoryFilter::from(name))
    }

    /// Case-insensitive substring match on the description combined with the
    /// category selector. An empty search matches everything.
    pub fn matches(&self, txn: &Transaction) -> bool {
        let needle = self.search.to_lowercase();
        matches_search(txn, &needle) && self.category.matches(&txn.category)
    }

    /// Applies the query and sorts newest first.
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        let needle = self.search.to_lowercase();
        let mut visible: Vec<&Transaction> = transactions
            .iter()
            .filter(|txn| matches_search(txn, &needle) && self.category.matches(&txn.category))
            .collect();
        // stable: equal dates keep collection order
        visible.sort_by(|a, b| b.date.cmp(&a.date));
        visible
    }
}

fn matches_search(txn: &Transaction, needle: &str) -> bool {
    needle.is_empty() || txn.description.to_lowercase().contains(needle)
}

/// Owned variant of [`TransactionQuery::apply`].
pub fn filter_and_sort(transactions: &[Transaction], query: &TransactionQuery) -> Vec<Transaction> {
    query.apply(transactions).into_iter().cloned().collect()
}
