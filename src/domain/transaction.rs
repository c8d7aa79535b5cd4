//! Income and expense records.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable, Record};

/// Direction of a transaction; decides its aggregation bucket and sign.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Sign applied when the amount is displayed.
    pub fn sign(&self) -> &'static str {
        match self {
            TransactionKind::Income => "+",
            TransactionKind::Expense => "-",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Ok(TransactionKind::Income),
            "expense" | "out" => Ok(TransactionKind::Expense),
            other => Err(format!(
                "unknown transaction type `{}` (expected income or expense)",
                other
            )),
        }
    }
}

/// A single income or expense entry.
///
/// `category` names a [`Category`](crate::domain::category::Category) by value.
/// The reference is not enforced; an empty string means uncategorised.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub category: String,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        description: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Self {
        Self::from_draft(
            Uuid::new_v4(),
            TransactionDraft::new(kind, description, amount, date, category),
        )
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Amount with the sign implied by the kind applied.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    /// Returns `true` when the transaction names a category.
    pub fn has_category(&self) -> bool {
        !self.category.trim().is_empty()
    }
}

/// Field values of a transaction that has not been assigned an id yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionDraft {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub category: String,
}

impl TransactionDraft {
    pub fn new(
        kind: TransactionKind,
        description: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            amount,
            date,
            category: category.into(),
        }
    }

    pub fn income(description: impl Into<String>, amount: Decimal, date: NaiveDate) -> Self {
        Self::new(TransactionKind::Income, description, amount, date, "")
    }

    pub fn expense(
        description: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Self {
        Self::new(TransactionKind::Expense, description, amount, date, category)
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!(
            "{} {} {}{}",
            self.date,
            self.description,
            self.kind.sign(),
            self.amount
        )
    }
}

impl Record for Transaction {
    type Draft = TransactionDraft;

    const KIND: &'static str = "Transaction";

    fn from_draft(id: Uuid, draft: TransactionDraft) -> Self {
        Self {
            id,
            kind: draft.kind,
            description: draft.description,
            amount: draft.amount,
            date: draft.date,
            category: draft.category,
        }
    }
}
