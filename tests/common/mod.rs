#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use finance_tracker::domain::{Identifiable, Record, Transaction, TransactionDraft, TransactionKind};
use finance_tracker::repository::{Latency, Repository, RepositoryResult, SeedData};
use finance_tracker::state::FinanceState;
use finance_tracker::store::MutationOrdering;
use rust_decimal::Decimal;
use uuid::Uuid;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn amount(value: i64) -> Decimal {
    Decimal::from(value)
}

pub fn txn(
    kind: TransactionKind,
    description: &str,
    value: i64,
    on: NaiveDate,
    category: &str,
) -> Transaction {
    Transaction::from_draft(
        Uuid::new_v4(),
        TransactionDraft::new(kind, description, amount(value), on, category),
    )
}

/// State over the built-in dataset with no artificial latency.
pub fn seeded_state() -> FinanceState {
    let seed = SeedData::builtin().expect("builtin seed parses");
    FinanceState::simulated(seed, Latency::none(), MutationOrdering::Interleaved)
}

/// Repository whose mutation calls take scripted amounts of time.
///
/// Each mutation pops the next delay from the queue (zero when empty) and
/// sleeps on the tokio clock, so tests with paused time can decide exactly
/// which call resolves first.
pub struct ScriptedRepository<R: Record> {
    seed: Vec<R>,
    delays: Mutex<VecDeque<Duration>>,
    resolved: Mutex<Vec<String>>,
}

impl<R: Record> ScriptedRepository<R> {
    pub fn new(seed: Vec<R>) -> Arc<Self> {
        Arc::new(Self {
            seed,
            delays: Mutex::new(VecDeque::new()),
            resolved: Mutex::new(Vec::new()),
        })
    }

    pub fn then_delay(&self, millis: u64) -> &Self {
        self.delays
            .lock()
            .unwrap()
            .push_back(Duration::from_millis(millis));
        self
    }

    /// Labels of resolved calls, in resolution order.
    pub fn resolved(&self) -> Vec<String> {
        self.resolved.lock().unwrap().clone()
    }

    async fn wait(&self, label: String) {
        let delay = self.delays.lock().unwrap().pop_front().unwrap_or_default();
        tokio::time::sleep(delay).await;
        self.resolved.lock().unwrap().push(label);
    }
}

#[async_trait]
impl<R: Record> Repository<R> for ScriptedRepository<R> {
    async fn load(&self) -> RepositoryResult<Vec<R>> {
        Ok(self.seed.clone())
    }

    async fn create(&self, draft: R::Draft) -> RepositoryResult<R> {
        let record = R::from_draft(Uuid::new_v4(), draft);
        self.wait(format!("create {}", record.id())).await;
        Ok(record)
    }

    async fn update(&self, record: R) -> RepositoryResult<R> {
        self.wait(format!("update {}", record.id())).await;
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<Uuid> {
        self.wait(format!("delete {}", id)).await;
        Ok(id)
    }
}
