//! Fixed datasets served by the simulated repositories.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;

use crate::domain::{Category, Transaction};
use crate::errors::RepositoryError;

pub const CATEGORIES_FILE: &str = "categories.json";
pub const TRANSACTIONS_FILE: &str = "transactions.json";

const BUILTIN_CATEGORIES: &str = include_str!("../../data/categories.json");
const BUILTIN_TRANSACTIONS: &str = include_str!("../../data/transactions.json");

static BUILTIN: Lazy<Result<SeedData, RepositoryError>> =
    Lazy::new(|| SeedData::from_json(BUILTIN_CATEGORIES, BUILTIN_TRANSACTIONS));

/// Initial categories and transactions returned by the first load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedData {
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
}

impl SeedData {
    pub fn new(categories: Vec<Category>, transactions: Vec<Transaction>) -> Self {
        Self {
            categories,
            transactions,
        }
    }

    /// Dataset compiled into the binary.
    pub fn builtin() -> Result<Self, RepositoryError> {
        (*BUILTIN).clone()
    }

    /// Reads `categories.json` and `transactions.json` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, RepositoryError> {
        let categories = read_records(&dir.join(CATEGORIES_FILE))?;
        let transactions = read_records(&dir.join(TRANSACTIONS_FILE))?;
        Ok(Self::new(categories, transactions))
    }

    pub fn from_json(categories: &str, transactions: &str) -> Result<Self, RepositoryError> {
        Ok(Self::new(
            serde_json::from_str(categories)?,
            serde_json::from_str(transactions)?,
        ))
    }

    /// Resolves the dataset for an optional seed directory.
    pub fn resolve(dir: Option<&Path>) -> Result<Self, RepositoryError> {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::builtin(),
        }
    }
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, RepositoryError> {
    let data = fs::read_to_string(path)
        .map_err(|err| RepositoryError::Seed(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&data)
        .map_err(|err| RepositoryError::Seed(format!("{}: {}", path.display(), err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_dataset_parses() {
        let seed = SeedData::builtin().expect("builtin seed parses");
        assert_eq!(seed.categories.len(), 8);
        assert_eq!(seed.transactions.len(), 10);
    }

    #[test]
    fn builtin_ids_are_unique() {
        let seed = SeedData::builtin().unwrap();
        let ids: HashSet<_> = seed.transactions.iter().map(|txn| txn.id).collect();
        assert_eq!(ids.len(), seed.transactions.len());
        let names: HashSet<_> = seed
            .categories
            .iter()
            .map(|category| category.normalized_name())
            .collect();
        assert_eq!(names.len(), seed.categories.len());
    }

    #[test]
    fn from_dir_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = SeedData::from_dir(dir.path()).expect_err("empty dir has no seed");
        assert!(matches!(err, RepositoryError::Seed(ref msg) if msg.contains(CATEGORIES_FILE)));
    }
}
