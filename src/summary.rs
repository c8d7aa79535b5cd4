//! Totals, net balance and per-category expense breakdown.
//!
//! Everything here is a pure function of a transaction slice. Results are
//! deterministic: the same slice always produces the same summary, with the
//! breakdown ordered by first appearance of each category.

use std::sync::{Mutex, PoisonError};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Transaction, TransactionKind};

/// Breakdown label for expenses whose category is empty.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Colours assigned to breakdown slices by index, wrapping around.
pub const CHART_PALETTE: [&str; 8] = [
    "#4F46E5", "#0EA5A4", "#F97316", "#EF4444", "#F59E0B", "#8B5CF6", "#06B6D4", "#F472B6",
];

pub const INCOME_COLOR: &str = "#10B981";
pub const EXPENSE_COLOR: &str = "#06422E";

/// Expense totals per category in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    entries: Vec<(String, Decimal)>,
}

impl CategoryBreakdown {
    fn add(&mut self, label: &str, amount: Decimal) {
        match self.entries.iter_mut().find(|(existing, _)| existing == label) {
            Some((_, total)) => *total += amount,
            None => self.entries.push((label.to_string(), amount)),
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(label, _)| label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<Decimal> {
        self.entries.iter().map(|(_, value)| *value).collect()
    }

    pub fn get(&self, label: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries
            .iter()
            .map(|(label, value)| (label.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|(_, value)| *value).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_balance: Decimal,
    pub category_breakdown: CategoryBreakdown,
}

impl Summary {
    /// One slice per breakdown entry, coloured from [`CHART_PALETTE`].
    pub fn category_slices(&self) -> Vec<ChartSlice> {
        self.category_breakdown
            .iter()
            .enumerate()
            .map(|(index, (label, value))| ChartSlice {
                label: label.to_string(),
                value,
                color: CHART_PALETTE[index % CHART_PALETTE.len()],
            })
            .collect()
    }

    /// Two-slice dataset comparing income with expenses.
    pub fn income_vs_expenses(&self) -> [ChartSlice; 2] {
        [
            ChartSlice {
                label: "Income".into(),
                value: self.total_income,
                color: INCOME_COLOR,
            },
            ChartSlice {
                label: "Expenses".into(),
                value: self.total_expenses,
                color: EXPENSE_COLOR,
            },
        ]
    }
}

/// Chart-ready data point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSlice {
    pub label: String,
    pub value: Decimal,
    pub color: &'static str,
}

/// Aggregates a transaction collection in a single pass.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut summary = Summary::default();
    for txn in transactions {
        match txn.kind {
            TransactionKind::Income => summary.total_income += txn.amount,
            TransactionKind::Expense => {
                summary.total_expenses += txn.amount;
                let label = if txn.has_category() {
                    txn.category.as_str()
                } else {
                    UNCATEGORIZED
                };
                summary.category_breakdown.add(label, txn.amount);
            }
        }
    }
    summary.net_balance = summary.total_income - summary.total_expenses;
    summary
}

/// Remembers the last summary together with the collection version it was
/// computed from.
#[derive(Debug, Default)]
pub struct SummaryCache {
    slot: Mutex<Option<(u64, Summary)>>,
}

impl SummaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached summary for `version`, computing it on a miss.
    pub fn get_or_compute(&self, version: u64, compute: impl FnOnce() -> Summary) -> Summary {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((cached, summary)) = slot.as_ref() {
            if *cached == version {
                return summary.clone();
            }
        }
        let summary = compute();
        tracing::trace!(version, "summary recomputed");
        *slot = Some((version, summary.clone()));
        summary
    }
}
