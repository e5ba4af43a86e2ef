//! Ordered change log with optional coalescing.

use serde::{Deserialize, Serialize};

use crate::change::{BatchId, Change, ChangeKind};

/// How consecutive property changes are grouped.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingPolicy {
    /// One record per mutation.
    #[default]
    Every,
    /// Consecutive `PropertyChanged` records for the same target within one
    /// batch merge into one, keeping the first `old` and the last `new`.
    CoalesceTarget,
}

#[derive(Clone, Debug, Default)]
pub struct ChangeAggregator {
    changes: Vec<Change>,
    policy: GroupingPolicy,
    batch: BatchId,
}

impl ChangeAggregator {
    pub fn new(policy: GroupingPolicy) -> Self {
        Self {
            changes: Vec::new(),
            policy,
            batch: BatchId::default(),
        }
    }

    pub fn policy(&self) -> GroupingPolicy {
        self.policy
    }

    pub fn current_batch(&self) -> BatchId {
        self.batch
    }

    /// Start a new batch; subsequent records carry the returned id.
    pub fn begin_batch(&mut self) -> BatchId {
        self.batch = BatchId(self.batch.0.wrapping_add(1));
        self.batch
    }

    pub fn record(&mut self, kind: ChangeKind) {
        if self.policy == GroupingPolicy::CoalesceTarget {
            if let ChangeKind::PropertyChanged { target, new, .. } = &kind {
                if let Some(Change {
                    batch,
                    kind: ChangeKind::PropertyChanged {
                        target: last_target,
                        new: last_new,
                        ..
                    },
                }) = self.changes.last_mut()
                {
                    if *batch == self.batch && last_target == target {
                        *last_new = *new;
                        return;
                    }
                }
            }
        }
        self.changes.push(Change::new(self.batch, kind));
    }

    /// Recorded changes, oldest first.
    pub fn peek(&self) -> &[Change] {
        &self.changes
    }

    /// Take every recorded change, oldest first.
    pub fn drain(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.changes)
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn clear(&mut self) {
        self.changes.clear();
    }
}
