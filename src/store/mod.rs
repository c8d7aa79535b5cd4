//! In-memory entity stores with asynchronous, repository-backed mutations.
//!
//! A store owns an ordered collection plus a status and per-operation busy and
//! error fields. Every mutation goes through the same lifecycle:
//!
//! 1. **pending**: the busy flag is raised and the previous error cleared;
//! 2. the draft/record is validated against the committed collection;
//! 3. the repository call is awaited (this is where wall time passes);
//! 4. **fulfilled** or **rejected**: under the state lock the change is
//!    re-validated and applied, the busy flag lowered and the error recorded.
//!
//! Changes are applied only after the repository resolves. Nothing is applied
//! optimistically, so a rejected call never needs a rollback.

pub mod status;
mod turnstile;
pub mod validation;

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::repository::Repository;

use turnstile::{Ticket, Turnstile};

pub use status::{Operation, OperationState, StoreSnapshot, StoreStatus};
pub use validation::Validate;

pub type StoreResult<T> = Result<T, StoreError>;

/// How overlapping mutations on one store are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MutationOrdering {
    /// Mutations commit in the order their repository calls resolve, so the
    /// last call to resolve wins.
    #[default]
    Interleaved,
    /// Mutations take a queue ticket the moment they are received and run one
    /// at a time in ticket order.
    Serialized,
}

struct StoreState<R> {
    items: Vec<R>,
    status: StoreStatus,
    version: u64,
    load: OperationState,
    add: OperationState,
    update: OperationState,
    delete: OperationState,
}

impl<R> StoreState<R> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            status: StoreStatus::Idle,
            version: 0,
            load: OperationState::default(),
            add: OperationState::default(),
            update: OperationState::default(),
            delete: OperationState::default(),
        }
    }

    fn slot(&self, op: Operation) -> &OperationState {
        match op {
            Operation::Load => &self.load,
            Operation::Add => &self.add,
            Operation::Update => &self.update,
            Operation::Delete => &self.delete,
        }
    }

    fn slot_mut(&mut self, op: Operation) -> &mut OperationState {
        match op {
            Operation::Load => &mut self.load,
            Operation::Add => &mut self.add,
            Operation::Update => &mut self.update,
            Operation::Delete => &mut self.delete,
        }
    }
}

struct Inner<R: Validate> {
    state: Mutex<StoreState<R>>,
    repository: Arc<dyn Repository<R>>,
    ordering: MutationOrdering,
    writer_queue: Arc<Turnstile>,
}

/// Collection of records of one kind plus its operation bookkeeping.
///
/// Cloning is cheap and yields a handle to the same store.
pub struct EntityStore<R: Validate> {
    inner: Arc<Inner<R>>,
}

impl<R: Validate> Clone for EntityStore<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Handle to an operation started with one of the `dispatch_*` methods.
pub struct Pending<T> {
    handle: JoinHandle<StoreResult<T>>,
}

impl<T: Send + 'static> Pending<T> {
    fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = StoreResult<T>> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the operation to settle.
    pub async fn wait(self) -> StoreResult<T> {
        match self.handle.await {
            Ok(result) => result,
            Err(err) => Err(StoreError::Interrupted(err.to_string())),
        }
    }
}

impl<R: Validate> EntityStore<R> {
    pub fn new(repository: Arc<dyn Repository<R>>) -> Self {
        Self::with_ordering(repository, MutationOrdering::default())
    }

    pub fn with_ordering(repository: Arc<dyn Repository<R>>, ordering: MutationOrdering) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(StoreState::new()),
                repository,
                ordering,
                writer_queue: Turnstile::new(),
            }),
        }
    }

    pub fn ordering(&self) -> MutationOrdering {
        self.inner.ordering
    }

    /// Copy of the committed collection.
    pub fn items(&self) -> Vec<R> {
        self.lock().items.clone()
    }

    /// Runs `f` against the committed collection without cloning it.
    pub fn read<T>(&self, f: impl FnOnce(&[R]) -> T) -> T {
        let state = self.lock();
        f(&state.items)
    }

    pub fn get(&self, id: Uuid) -> Option<R> {
        self.read(|items| items.iter().find(|item| item.id() == id).cloned())
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn status(&self) -> StoreStatus {
        self.lock().status
    }

    /// Counter bumped on every committed change to the collection.
    pub fn version(&self) -> u64 {
        self.lock().version
    }

    pub fn is_busy(&self, op: Operation) -> bool {
        self.lock().slot(op).is_busy()
    }

    pub fn error(&self, op: Operation) -> Option<String> {
        self.lock().slot(op).error().map(str::to_string)
    }

    pub fn snapshot(&self) -> StoreSnapshot<R> {
        let state = self.lock();
        StoreSnapshot {
            items: state.items.clone(),
            status: state.status,
            version: state.version,
            loading: state.load.is_busy(),
            adding: state.add.is_busy(),
            updating: state.update.is_busy(),
            deleting: state.delete.is_busy(),
            load_error: state.load.error().map(str::to_string),
            add_error: state.add.error().map(str::to_string),
            update_error: state.update.error().map(str::to_string),
            delete_error: state.delete.error().map(str::to_string),
        }
    }

    /// Resets every per-operation error field.
    pub fn clear_errors(&self) {
        let mut state = self.lock();
        for op in Operation::ALL {
            state.slot_mut(op).clear_error();
        }
    }

    /// Replaces the collection with the repository's dataset.
    ///
    /// Concurrent loads are not deduplicated; see [`EntityStore::load_if_needed`].
    pub async fn load_all(&self) -> StoreResult<usize> {
        self.begin(Operation::Load);
        self.run_load().await
    }

    /// Loads unless a load is in flight or has already succeeded. Returns
    /// whether a load ran.
    pub async fn load_if_needed(&self) -> StoreResult<bool> {
        if matches!(self.status(), StoreStatus::Loading | StoreStatus::Succeeded) {
            return Ok(false);
        }
        self.load_all().await.map(|_| true)
    }

    /// Validates `draft`, has the repository assign an id and appends the new
    /// record.
    pub async fn create(&self, draft: R::Draft) -> StoreResult<R> {
        let ticket = self.begin(Operation::Add);
        self.run_create(ticket, draft).await
    }

    /// Replaces the record with the same id, keeping its position.
    pub async fn update(&self, record: R) -> StoreResult<R> {
        let ticket = self.begin(Operation::Update);
        self.run_update(ticket, record).await
    }

    pub async fn delete(&self, id: Uuid) -> StoreResult<Uuid> {
        let ticket = self.begin(Operation::Delete);
        self.run_delete(ticket, id).await
    }

    /// Starts a load on the runtime and returns immediately.
    pub fn dispatch_load(&self) -> Pending<usize> {
        self.begin(Operation::Load);
        let store = self.clone();
        Pending::spawn(async move { store.run_load().await })
    }

    pub fn dispatch_create(&self, draft: R::Draft) -> Pending<R> {
        let ticket = self.begin(Operation::Add);
        let store = self.clone();
        Pending::spawn(async move { store.run_create(ticket, draft).await })
    }

    pub fn dispatch_update(&self, record: R) -> Pending<R> {
        let ticket = self.begin(Operation::Update);
        let store = self.clone();
        Pending::spawn(async move { store.run_update(ticket, record).await })
    }

    pub fn dispatch_delete(&self, id: Uuid) -> Pending<Uuid> {
        let ticket = self.begin(Operation::Delete);
        let store = self.clone();
        Pending::spawn(async move { store.run_delete(ticket, id).await })
    }

    async fn run_load(&self) -> StoreResult<usize> {
        let outcome = self
            .inner
            .repository
            .load()
            .await
            .map_err(|err| StoreError::Load(err.to_string()));
        self.settle(Operation::Load, outcome, |items, fetched| {
            let count = fetched.len();
            *items = fetched;
            Ok(count)
        })
    }

    async fn run_create(&self, ticket: Option<Ticket>, draft: R::Draft) -> StoreResult<R> {
        wait_turn(&ticket).await;
        let checked = self.check(|items| R::validate_draft(&draft, items));
        let outcome = match checked {
            Ok(()) => self
                .inner
                .repository
                .create(draft)
                .await
                .map_err(StoreError::from),
            Err(err) => Err(err),
        };
        self.settle(Operation::Add, outcome, |items, record| {
            R::validate_record(&record, items)?;
            tracing::trace!(kind = R::KIND, record = %record.display_label(), "appending");
            items.push(record.clone());
            Ok(record)
        })
    }

    async fn run_update(&self, ticket: Option<Ticket>, record: R) -> StoreResult<R> {
        wait_turn(&ticket).await;
        let id = record.id();
        let checked = self.check(|items| {
            if !items.iter().any(|item| item.id() == id) {
                return Err(R::not_found());
            }
            R::validate_record(&record, items)
        });
        let outcome = match checked {
            Ok(()) => self
                .inner
                .repository
                .update(record)
                .await
                .map_err(StoreError::from),
            Err(err) => Err(err),
        };
        self.settle(Operation::Update, outcome, |items, updated| {
            let position = position_of(items, updated.id())?;
            R::validate_record(&updated, items)?;
            tracing::trace!(kind = R::KIND, record = %updated.display_label(), "replacing");
            items[position] = updated.clone();
            Ok(updated)
        })
    }

    async fn run_delete(&self, ticket: Option<Ticket>, id: Uuid) -> StoreResult<Uuid> {
        wait_turn(&ticket).await;
        let checked = self.check(|items| position_of(items, id).map(|_| ()));
        let outcome = match checked {
            Ok(()) => self
                .inner
                .repository
                .delete(id)
                .await
                .map_err(StoreError::from),
            Err(err) => Err(err),
        };
        self.settle(Operation::Delete, outcome, |items, removed| {
            let position = position_of(items, removed)?;
            items.remove(position);
            Ok(removed)
        })
    }

    fn lock(&self) -> MutexGuard<'_, StoreState<R>> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self, rule: impl FnOnce(&[R]) -> StoreResult<()>) -> StoreResult<()> {
        let state = self.lock();
        rule(&state.items)
    }

    /// Raises the busy flag and, for serialized mutations, takes the queue
    /// ticket. Runs synchronously on the caller so the ticket order is the
    /// order requests were received.
    fn begin(&self, op: Operation) -> Option<Ticket> {
        let mut state = self.lock();
        state.slot_mut(op).begin();
        if op == Operation::Load {
            state.status = StoreStatus::Loading;
        }
        let ticket = match self.inner.ordering {
            MutationOrdering::Serialized if op != Operation::Load => {
                Some(self.inner.writer_queue.issue())
            }
            _ => None,
        };
        drop(state);
        tracing::debug!(kind = R::KIND, %op, queued = ticket.is_some(), "operation pending");
        ticket
    }

    /// Applies a resolved outcome and settles the operation's bookkeeping in a
    /// single critical section.
    fn settle<T, U>(
        &self,
        op: Operation,
        outcome: StoreResult<T>,
        apply: impl FnOnce(&mut Vec<R>, T) -> StoreResult<U>,
    ) -> StoreResult<U> {
        let mut state = self.lock();
        let result = outcome.and_then(|value| apply(&mut state.items, value));
        let error = result.as_ref().err().map(ToString::to_string);
        if error.is_none() {
            state.version += 1;
        }
        if op == Operation::Load {
            state.status = if error.is_none() {
                StoreStatus::Succeeded
            } else {
                StoreStatus::Failed
            };
        }
        state.slot_mut(op).settle(error.clone());
        let len = state.items.len();
        drop(state);

        match error {
            None => tracing::info!(kind = R::KIND, %op, len, "operation fulfilled"),
            Some(message) => tracing::warn!(kind = R::KIND, %op, error = %message, "operation rejected"),
        }
        result
    }
}

async fn wait_turn(ticket: &Option<Ticket>) {
    if let Some(ticket) = ticket {
        ticket.wait_turn().await;
    }
}

fn position_of<R: Validate>(items: &[R], id: Uuid) -> StoreResult<usize> {
    items
        .iter()
        .position(|item| item.id() == id)
        .ok_or_else(R::not_found)
}
