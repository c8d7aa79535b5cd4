use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Record;
use crate::errors::RepositoryError;

use super::{Latency, Repository, RepositoryResult};

/// Repository calls that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOp {
    Load,
    Create,
    Update,
    Delete,
}

impl fmt::Display for RepositoryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RepositoryOp::Load => "load",
            RepositoryOp::Create => "create",
            RepositoryOp::Update => "update",
            RepositoryOp::Delete => "delete",
        };
        f.write_str(label)
    }
}

/// Stand-in for a network API.
///
/// `load` resolves to a fixed dataset; mutations echo their input back after
/// assigning ids. Every call sleeps for the configured latency first. Failures
/// can be queued per call kind with [`SimulatedRepository::fail_next`].
pub struct SimulatedRepository<R: Record> {
    seed: Vec<R>,
    latency: Latency,
    failures: Mutex<HashMap<RepositoryOp, VecDeque<String>>>,
}

impl<R: Record> SimulatedRepository<R> {
    pub fn new(seed: Vec<R>, latency: Latency) -> Self {
        Self {
            seed,
            latency,
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Repository with no seed records and no delay.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Latency::none())
    }

    /// Makes the next call of kind `op` fail with `message`.
    pub fn fail_next(&self, op: RepositoryOp, message: impl Into<String>) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(op)
            .or_default()
            .push_back(message.into());
    }

    async fn round_trip(&self, op: RepositoryOp, delay: Duration) -> RepositoryResult<()> {
        if !delay.is_zero() {
            tracing::debug!(
                kind = R::KIND,
                %op,
                delay_ms = delay.as_millis() as u64,
                "simulating latency"
            );
            tokio::time::sleep(delay).await;
        }
        let planned = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&op)
            .and_then(VecDeque::pop_front);
        match planned {
            Some(message) => {
                tracing::warn!(kind = R::KIND, %op, %message, "simulated failure");
                Err(RepositoryError::Unavailable(message))
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<R: Record> Repository<R> for SimulatedRepository<R> {
    async fn load(&self) -> RepositoryResult<Vec<R>> {
        self.round_trip(RepositoryOp::Load, self.latency.load())
            .await?;
        Ok(self.seed.clone())
    }

    async fn create(&self, draft: R::Draft) -> RepositoryResult<R> {
        self.round_trip(RepositoryOp::Create, self.latency.mutation())
            .await?;
        Ok(R::from_draft(Uuid::new_v4(), draft))
    }

    async fn update(&self, record: R) -> RepositoryResult<R> {
        self.round_trip(RepositoryOp::Update, self.latency.mutation())
            .await?;
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<Uuid> {
        self.round_trip(RepositoryOp::Delete, self.latency.mutation())
            .await?;
        Ok(id)
    }
}
