use std::fmt;

use serde::{Deserialize, Serialize};

/// Overall lifecycle of a store's collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StoreStatus::Idle => "idle",
            StoreStatus::Loading => "loading",
            StoreStatus::Succeeded => "succeeded",
            StoreStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Store operations that track their own busy flag and last error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Load,
    Add,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Load,
        Operation::Add,
        Operation::Update,
        Operation::Delete,
    ];
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::Load => "load",
            Operation::Add => "add",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(label)
    }
}

/// Busy/error bookkeeping for a single operation kind.
///
/// `in_flight` counts overlapping calls so the busy flag stays raised until the
/// last of them settles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationState {
    in_flight: usize,
    error: Option<String>,
}

impl OperationState {
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn begin(&mut self) {
        self.in_flight += 1;
        self.error = None;
    }

    pub(crate) fn settle(&mut self, error: Option<String>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.error = error;
    }

    pub(crate) fn clear_error(&mut self) {
        self.error = None;
    }
}

/// Point-in-time copy of a store, suitable for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot<R> {
    pub items: Vec<R>,
    pub status: StoreStatus,
    pub version: u64,
    pub loading: bool,
    pub adding: bool,
    pub updating: bool,
    pub deleting: bool,
    pub load_error: Option<String>,
    pub add_error: Option<String>,
    pub update_error: Option<String>,
    pub delete_error: Option<String>,
}

impl<R> StoreSnapshot<R> {
    pub fn is_busy(&self, op: Operation) -> bool {
        match op {
            Operation::Load => self.loading,
            Operation::Add => self.adding,
            Operation::Update => self.updating,
            Operation::Delete => self.deleting,
        }
    }

    pub fn error(&self, op: Operation) -> Option<&str> {
        match op {
            Operation::Load => self.load_error.as_deref(),
            Operation::Add => self.add_error.as_deref(),
            Operation::Update => self.update_error.as_deref(),
            Operation::Delete => self.delete_error.as_deref(),
        }
    }

    /// Every recorded error paired with the operation that produced it.
    pub fn errors(&self) -> Vec<(Operation, &str)> {
        Operation::ALL
            .iter()
            .filter_map(|op| self.error(*op).map(|message| (*op, message)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_flag_tracks_overlapping_calls() {
        let mut state = OperationState::default();
        state.begin();
        state.begin();
        state.settle(None);
        assert!(state.is_busy());
        state.settle(Some("boom".into()));
        assert!(!state.is_busy());
        assert_eq!(state.error(), Some("boom"));
    }

    #[test]
    fn begin_clears_previous_error() {
        let mut state = OperationState::default();
        state.begin();
        state.settle(Some("boom".into()));
        state.begin();
        assert_eq!(state.error(), None);
    }
}
