//! The five-container [`StateStore`] and the [`Synchronizer`] computing
//! delta updates for transports.
//!
//! The store owns one versioned container per subsystem -- world layout,
//! combat statistics, active configuration, behavior assignments, and
//! the agent roster -- under fixed, well-known ids. Mutation operations
//! that span subsystems (e.g. spawning an agent touches both the roster
//! and the combat containers) perform all their `set` calls within one
//! synchronous call; there is no partial-commit path.
//!
//! The synchronizer keeps per-container sync metadata and sweeps the
//! store's dirty ledger: a container whose `last_updated` is newer than
//! the recorded `last_sync` gets its synchronizer version bumped.
//! [`Synchronizer::delta_update`] returns `{value, version, timestamp}`
//! for every container the synchronizer knows about -- a full
//! state-by-id map the transport can diff or replace wholesale.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use skirmish_types::snapshot::{AgentSnapshot, DeltaEntry, TeamStats, WorldSnapshot};
use skirmish_types::ContainerId;

use crate::container::{DirtyLedger, StateContainer};

/// Well-known id of the world-layout container.
pub const WORLD_CONTAINER: ContainerId = ContainerId::from_u128(1);

/// Well-known id of the combat-statistics container.
pub const COMBAT_CONTAINER: ContainerId = ContainerId::from_u128(2);

/// Well-known id of the active-configuration container.
pub const CONFIG_CONTAINER: ContainerId = ContainerId::from_u128(3);

/// Well-known id of the behavior-assignments container.
pub const BEHAVIOR_CONTAINER: ContainerId = ContainerId::from_u128(4);

/// Well-known id of the agent-roster container.
pub const AGENTS_CONTAINER: ContainerId = ContainerId::from_u128(5);

/// The five subsystem containers plus the shared dirty ledger.
#[derive(Debug, Clone)]
pub struct StateStore {
    ledger: DirtyLedger,
    world: StateContainer<WorldSnapshot>,
    combat: StateContainer<TeamStats>,
    config: StateContainer<Option<serde_json::Value>>,
    behaviors: StateContainer<BTreeMap<String, String>>,
    agents: StateContainer<Vec<AgentSnapshot>>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    /// Create a store with empty initial values in every container.
    pub fn new() -> Self {
        Self {
            ledger: DirtyLedger::new(),
            world: StateContainer::new(WORLD_CONTAINER, WorldSnapshot::default()),
            combat: StateContainer::new(COMBAT_CONTAINER, TeamStats::default()),
            config: StateContainer::new(CONFIG_CONTAINER, None),
            behaviors: StateContainer::new(BEHAVIOR_CONTAINER, BTreeMap::new()),
            agents: StateContainer::new(AGENTS_CONTAINER, Vec::new()),
        }
    }

    /// The ids of every container, in id order.
    pub const fn container_ids() -> [ContainerId; 5] {
        [
            WORLD_CONTAINER,
            COMBAT_CONTAINER,
            CONFIG_CONTAINER,
            BEHAVIOR_CONTAINER,
            AGENTS_CONTAINER,
        ]
    }

    /// Publish a new world layout.
    pub fn set_world(&mut self, snapshot: WorldSnapshot) {
        self.world.set(snapshot, &mut self.ledger);
    }

    /// Publish new combat statistics.
    pub fn set_combat(&mut self, stats: TeamStats) {
        self.combat.set(stats, &mut self.ledger);
    }

    /// Publish the active configuration parameters.
    pub fn set_config(&mut self, config: Option<serde_json::Value>) {
        self.config.set(config, &mut self.ledger);
    }

    /// Publish the behavior assignments.
    pub fn set_behaviors(&mut self, assignments: BTreeMap<String, String>) {
        self.behaviors.set(assignments, &mut self.ledger);
    }

    /// Publish the agent roster snapshot.
    pub fn set_agents(&mut self, agents: Vec<AgentSnapshot>) {
        self.agents.set(agents, &mut self.ledger);
    }

    /// The current world layout.
    pub const fn world(&self) -> &WorldSnapshot {
        self.world.value()
    }

    /// The current combat statistics.
    pub const fn combat(&self) -> &TeamStats {
        self.combat.value()
    }

    /// The active configuration parameters.
    pub const fn config(&self) -> &Option<serde_json::Value> {
        self.config.value()
    }

    /// The current behavior assignments.
    pub const fn behaviors(&self) -> &BTreeMap<String, String> {
        self.behaviors.value()
    }

    /// The current agent roster snapshot.
    pub fn agents(&self) -> &[AgentSnapshot] {
        self.agents.value()
    }

    /// Drain the dirty ledger.
    pub fn take_dirty(&mut self) -> std::collections::BTreeSet<ContainerId> {
        self.ledger.take()
    }

    /// `last_updated` of the container with the given id.
    fn last_updated(&self, id: ContainerId) -> Option<DateTime<Utc>> {
        match id {
            WORLD_CONTAINER => Some(self.world.last_updated()),
            COMBAT_CONTAINER => Some(self.combat.last_updated()),
            CONFIG_CONTAINER => Some(self.config.last_updated()),
            BEHAVIOR_CONTAINER => Some(self.behaviors.last_updated()),
            AGENTS_CONTAINER => Some(self.agents.last_updated()),
            _ => None,
        }
    }

    /// JSON projection of the container with the given id.
    fn value_json(&self, id: ContainerId) -> Option<serde_json::Value> {
        let result = match id {
            WORLD_CONTAINER => serde_json::to_value(self.world.value()),
            COMBAT_CONTAINER => serde_json::to_value(self.combat.value()),
            CONFIG_CONTAINER => serde_json::to_value(self.config.value()),
            BEHAVIOR_CONTAINER => serde_json::to_value(self.behaviors.value()),
            AGENTS_CONTAINER => serde_json::to_value(self.agents.value()),
            _ => return None,
        };
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(container = %id, %error, "Failed to serialize container value");
                None
            }
        }
    }
}

/// Per-container synchronization metadata.
#[derive(Debug, Clone)]
struct SyncEntry {
    /// Time of the most recent synchronization of this container.
    last_sync: DateTime<Utc>,
    /// The synchronizer's own version counter for this container.
    version: u64,
    /// Whether changes are pending transport pickup.
    pending: bool,
}

/// Tracks which containers changed and versions their synchronization.
#[derive(Debug, Clone, Default)]
pub struct Synchronizer {
    entries: BTreeMap<ContainerId, SyncEntry>,
}

impl Synchronizer {
    /// Create a synchronizer with no recorded containers.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Sweep the store's dirty ledger.
    ///
    /// For each dirtied container whose `last_updated` is newer than the
    /// recorded `last_sync`, bump the synchronizer version and refresh
    /// `last_sync`. Ids the synchronizer has never seen start from the
    /// Unix epoch so their first mutation always registers.
    pub fn synchronize(&mut self, store: &mut StateStore) {
        let now = Utc::now();
        let dirty = store.take_dirty();
        if dirty.is_empty() {
            return;
        }

        debug!(pending = dirty.len(), "Synchronizing dirty containers");

        for id in dirty {
            let Some(last_updated) = store.last_updated(id) else {
                warn!(container = %id, "Dirty id has no container in the store");
                continue;
            };

            let entry = self.entries.entry(id).or_insert_with(|| SyncEntry {
                last_sync: DateTime::<Utc>::UNIX_EPOCH,
                version: 0,
                pending: false,
            });

            if last_updated > entry.last_sync {
                entry.version = entry.version.saturating_add(1);
                entry.last_sync = now;
                entry.pending = true;
            }
        }
    }

    /// Whether any container has changes pending transport pickup.
    pub fn has_pending(&self) -> bool {
        self.entries.values().any(|e| e.pending)
    }

    /// Build the per-container `{value, version, timestamp}` map for
    /// every container the synchronizer knows about, and clear the
    /// pending flags.
    pub fn delta_update(&mut self, store: &StateStore) -> BTreeMap<String, DeltaEntry> {
        let mut updates = BTreeMap::new();

        for (id, entry) in &mut self.entries {
            let Some(value) = store.value_json(*id) else {
                continue;
            };
            updates.insert(
                id.to_string(),
                DeltaEntry {
                    value,
                    version: entry.version,
                    timestamp: entry.last_sync.timestamp_millis() as f64 / 1000.0,
                },
            );
            entry.pending = false;
        }

        updates
    }
}
