//! Domain types representing spending categories.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// Groups transactions for filtering and the spending breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    /// Comparison key used for the case-insensitive uniqueness rule.
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Returns a copy carrying a new name, keeping the identifier.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            id: self.id,
            name: name.into(),
        }
    }
}

/// Field values of a category that has not been assigned an id yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Identifiable for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Category {
    fn display_label(&self) -> String {
        self.name.clone()
    }
}

impl Record for Category {
    type Draft = CategoryDraft;

    const KIND: &'static str = "Category";

    fn from_draft(id: Uuid, draft: CategoryDraft) -> Self {
        Self {
            id,
            name: draft.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_name_ignores_case_and_padding() {
        let category = Category::new("  Food ");
        assert_eq!(category.normalized_name(), "food");
    }

    #[test]
    fn renamed_keeps_identifier() {
        let category = Category::new("Food");
        let renamed = category.renamed("Groceries");
        assert_eq!(renamed.id, category.id);
        assert_eq!(renamed.name, "Groceries");
    }
}
