//! Versioned state containers and the shared dirty ledger.
//!
//! Every subsystem's externally-visible state lives in a
//! [`StateContainer`]: a value plus a monotonically non-decreasing
//! version counter and a last-updated timestamp. Instead of observer
//! callbacks, each mutation marks the container's id in a
//! [`DirtyLedger`] that the synchronizer sweeps once per tick -- the
//! coordinator pulls changes, subsystems never push notifications.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use skirmish_types::ContainerId;

/// The set of container ids mutated since the last synchronizer sweep.
#[derive(Debug, Clone, Default)]
pub struct DirtyLedger {
    dirty: BTreeSet<ContainerId>,
}

impl DirtyLedger {
    /// Create an empty ledger.
    pub const fn new() -> Self {
        Self {
            dirty: BTreeSet::new(),
        }
    }

    /// Mark a container as mutated.
    pub fn mark(&mut self, id: ContainerId) {
        self.dirty.insert(id);
    }

    /// Whether the container is currently marked.
    pub fn is_dirty(&self, id: ContainerId) -> bool {
        self.dirty.contains(&id)
    }

    /// Number of marked containers.
    pub fn len(&self) -> usize {
        self.dirty.len()
    }

    /// Whether no container is marked.
    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    /// Drain and return every marked id.
    pub fn take(&mut self) -> BTreeSet<ContainerId> {
        std::mem::take(&mut self.dirty)
    }
}

/// A versioned, timestamped holder for one subsystem's state.
///
/// Invariants: `version` is monotonically non-decreasing and increments
/// exactly once per mutation; `last_updated` always reflects the most
/// recent [`set`](Self::set).
#[derive(Debug, Clone)]
pub struct StateContainer<T> {
    /// The container's well-known identifier.
    id: ContainerId,
    /// The value the container was created with; restored by `reset`.
    initial: T,
    /// The current value.
    value: T,
    /// Timestamp of the most recent mutation (creation time initially).
    last_updated: DateTime<Utc>,
    /// Mutation counter.
    version: u64,
}

impl<T: Clone> StateContainer<T> {
    /// Create a container holding `initial` at version 0.
    pub fn new(id: ContainerId, initial: T) -> Self {
        Self {
            id,
            value: initial.clone(),
            initial,
            last_updated: Utc::now(),
            version: 0,
        }
    }

    /// The container's identifier.
    pub const fn id(&self) -> ContainerId {
        self.id
    }

    /// The current value.
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// The mutation counter.
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Timestamp of the most recent mutation.
    pub const fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Replace the value, bump the version, stamp the time, and mark
    /// the container in the ledger.
    pub fn set(&mut self, value: T, ledger: &mut DirtyLedger) {
        self.value = value;
        self.version = self.version.saturating_add(1);
        self.last_updated = Utc::now();
        ledger.mark(self.id);
    }

    /// Restore the initial value through the same path as [`set`](Self::set).
    pub fn reset(&mut self, ledger: &mut DirtyLedger) {
        let initial = self.initial.clone();
        self.set(initial, ledger);
    }
}
