//! Field and uniqueness rules checked before a store commits a change.

use rust_decimal::Decimal;

use crate::domain::category::normalize_name;
use crate::domain::{Category, CategoryDraft, Record, Transaction, TransactionDraft};
use crate::errors::StoreError;

/// Validation hooks for records held by an [`EntityStore`](super::EntityStore).
///
/// `existing` is the committed collection at the time of the check. Existence
/// of the target id is checked by the store itself before these run.
pub trait Validate: Record {
    /// Checks a draft about to be created.
    fn validate_draft(draft: &Self::Draft, existing: &[Self]) -> Result<(), StoreError>;

    /// Checks a full record against every *other* record in the collection.
    fn validate_record(record: &Self, existing: &[Self]) -> Result<(), StoreError>;

    /// Message used when an id cannot be found.
    fn not_found() -> StoreError {
        StoreError::not_found(format!("{} not found", Self::KIND))
    }
}

impl Validate for Category {
    fn validate_draft(draft: &CategoryDraft, existing: &[Self]) -> Result<(), StoreError> {
        check_category_name(&draft.name, None, existing)
    }

    fn validate_record(record: &Self, existing: &[Self]) -> Result<(), StoreError> {
        check_category_name(&record.name, Some(record), existing)
    }
}

fn check_category_name(
    candidate: &str,
    current: Option<&Category>,
    existing: &[Category],
) -> Result<(), StoreError> {
    if candidate.trim().is_empty() {
        return Err(StoreError::validation("Category name cannot be empty"));
    }
    let normalized = normalize_name(candidate);
    let duplicate = existing.iter().any(|category| {
        category.normalized_name() == normalized && current.map_or(true, |c| c.id != category.id)
    });
    if duplicate {
        Err(StoreError::validation(format!(
            "Category `{}` already exists",
            candidate.trim()
        )))
    } else {
        Ok(())
    }
}

impl Validate for Transaction {
    fn validate_draft(draft: &TransactionDraft, _existing: &[Self]) -> Result<(), StoreError> {
        check_transaction_fields(&draft.description, draft.amount)
    }

    fn validate_record(record: &Self, _existing: &[Self]) -> Result<(), StoreError> {
        check_transaction_fields(&record.description, record.amount)
    }
}

fn check_transaction_fields(description: &str, amount: Decimal) -> Result<(), StoreError> {
    if description.trim().is_empty() {
        return Err(StoreError::validation(
            "Transaction description cannot be empty",
        ));
    }
    if amount <= Decimal::ZERO {
        return Err(StoreError::validation(
            "Transaction amount must be greater than 0",
        ));
    }
    Ok(())
}
