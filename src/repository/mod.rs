//! Data-access port used by the entity stores.
//!
//! The stores never talk to a data source directly; they go through
//! [`Repository`], which may take arbitrary wall time and may fail. The only
//! adapter shipped here is [`SimulatedRepository`], which serves seed data
//! after an artificial delay.

pub mod seed;
pub mod simulated;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Record;
use crate::errors::RepositoryError;

pub use seed::SeedData;
pub use simulated::{RepositoryOp, SimulatedRepository};

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Asynchronous CRUD capability backing one entity store.
#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Fetches the full collection.
    async fn load(&self) -> RepositoryResult<Vec<R>>;

    /// Persists a draft and returns the record with its assigned id.
    async fn create(&self, draft: R::Draft) -> RepositoryResult<R>;

    /// Persists the new state of an existing record.
    async fn update(&self, record: R) -> RepositoryResult<R>;

    /// Removes a record, returning the id that was removed.
    async fn delete(&self, id: Uuid) -> RepositoryResult<Uuid>;
}

/// Simulated round-trip times for repository calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Latency {
    pub load_ms: u64,
    pub mutation_ms: u64,
}

impl Latency {
    pub const fn new(load_ms: u64, mutation_ms: u64) -> Self {
        Self {
            load_ms,
            mutation_ms,
        }
    }

    /// No artificial delay at all.
    pub const fn none() -> Self {
        Self::new(0, 0)
    }

    pub fn load(&self) -> Duration {
        Duration::from_millis(self.load_ms)
    }

    pub fn mutation(&self) -> Duration {
        Duration::from_millis(self.mutation_ms)
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::new(300, 500)
    }
}
