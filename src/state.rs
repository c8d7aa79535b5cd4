//! Application state container shared by every collaborator.

use std::sync::Arc;

use uuid::Uuid;

use crate::config::Config;
use crate::domain::{Category, Transaction};
use crate::errors::{RepositoryError, StoreError};
use crate::repository::{Latency, Repository, SeedData, SimulatedRepository};
use crate::store::{EntityStore, MutationOrdering, StoreResult, StoreStatus};
use crate::summary::{summarize, Summary, SummaryCache};
use crate::view::TransactionQuery;

/// Owns the transaction and category stores plus the derived summary cache.
///
/// Constructed explicitly and handed to whoever needs it; there is no global
/// instance.
pub struct FinanceState {
    pub transactions: EntityStore<Transaction>,
    pub categories: EntityStore<Category>,
    summary_cache: SummaryCache,
}

/// How many transactions still name a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryUsage {
    pub category: Category,
    pub transaction_count: usize,
}

impl CategoryUsage {
    /// Message to show before deleting a category that is still referenced.
    pub fn warning(&self) -> Option<String> {
        match self.transaction_count {
            0 => None,
            count => Some(format!(
                "{} transaction{} still use category `{}`; {} keep the name after deletion",
                count,
                if count == 1 { "" } else { "s" },
                self.category.name,
                if count == 1 { "it will" } else { "they will" },
            )),
        }
    }
}

impl FinanceState {
    pub fn new(
        transactions: Arc<dyn Repository<Transaction>>,
        categories: Arc<dyn Repository<Category>>,
        ordering: MutationOrdering,
    ) -> Self {
        Self::from_stores(
            EntityStore::with_ordering(transactions, ordering),
            EntityStore::with_ordering(categories, ordering),
        )
    }

    pub fn from_stores(
        transactions: EntityStore<Transaction>,
        categories: EntityStore<Category>,
    ) -> Self {
        Self {
            transactions,
            categories,
            summary_cache: SummaryCache::new(),
        }
    }

    /// State backed by simulated repositories serving `seed`.
    pub fn simulated(seed: SeedData, latency: Latency, ordering: MutationOrdering) -> Self {
        Self::new(
            Arc::new(SimulatedRepository::new(seed.transactions, latency)),
            Arc::new(SimulatedRepository::new(seed.categories, latency)),
            ordering,
        )
    }

    pub fn from_config(config: &Config) -> Result<Self, RepositoryError> {
        let seed = SeedData::resolve(config.seed_dir.as_deref())?;
        tracing::debug!(
            categories = seed.categories.len(),
            transactions = seed.transactions.len(),
            ordering = ?config.ordering,
            "building simulated state"
        );
        Ok(Self::simulated(seed, config.latency, config.ordering))
    }

    /// Loads every store that has not been loaded yet. Both loads run
    /// concurrently; the first error is returned after both settle.
    pub async fn ensure_loaded(&self) -> StoreResult<()> {
        let (transactions, categories) = tokio::join!(
            self.transactions.load_if_needed(),
            self.categories.load_if_needed()
        );
        transactions?;
        categories?;
        Ok(())
    }

    /// Forces a fresh load of both stores.
    pub async fn reload(&self) -> StoreResult<()> {
        let (transactions, categories) =
            tokio::join!(self.transactions.load_all(), self.categories.load_all());
        transactions?;
        categories?;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.transactions.status() == StoreStatus::Succeeded
            && self.categories.status() == StoreStatus::Succeeded
    }

    /// Summary of the committed transactions, recomputed only after a change.
    pub fn summary(&self) -> Summary {
        let version = self.transactions.version();
        self.summary_cache
            .get_or_compute(version, || self.transactions.read(summarize))
    }

    pub fn visible_transactions(&self, query: &TransactionQuery) -> Vec<Transaction> {
        self.transactions
            .read(|items| query.apply(items).into_iter().cloned().collect())
    }

    /// Category names in collection order, for selectors.
    pub fn category_names(&self) -> Vec<String> {
        self.categories
            .read(|items| items.iter().map(|category| category.name.clone()).collect())
    }

    pub fn category_usage(&self, id: Uuid) -> StoreResult<CategoryUsage> {
        let category = self
            .categories
            .get(id)
            .ok_or_else(|| StoreError::not_found("Category not found"))?;
        let transaction_count = self.transactions.read(|items| {
            items
                .iter()
                .filter(|txn| txn.category == category.name)
                .count()
        });
        Ok(CategoryUsage {
            category,
            transaction_count,
        })
    }

    pub fn clear_errors(&self) {
        self.transactions.clear_errors();
        self.categories.clear_errors();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryDraft;

    fn state() -> FinanceState {
        let seed = SeedData::builtin().unwrap();
        FinanceState::simulated(seed, Latency::none(), MutationOrdering::Interleaved)
    }

    #[tokio::test]
    async fn ensure_loaded_only_loads_once() {
        let state = state();
        state.ensure_loaded().await.unwrap();
        assert!(state.is_loaded());
        let version = state.transactions.version();

        state.ensure_loaded().await.unwrap();
        assert_eq!(state.transactions.version(), version);
    }

    #[tokio::test]
    async fn usage_counts_referencing_transactions() {
        let state = state();
        state.ensure_loaded().await.unwrap();
        let food = state
            .categories
            .items()
            .into_iter()
            .find(|category| category.name == "Food")
            .unwrap();

        let usage = state.category_usage(food.id).unwrap();
        assert_eq!(usage.transaction_count, 2);
        assert!(usage.warning().unwrap().contains("2 transactions"));
    }

    #[tokio::test]
    async fn unused_category_has_no_warning() {
        let state = state();
        let fresh = state
            .categories
            .create(CategoryDraft::new("Pets"))
            .await
            .unwrap();
        assert_eq!(state.category_usage(fresh.id).unwrap().warning(), None);
    }
}
