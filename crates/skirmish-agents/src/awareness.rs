//! Perception zones and zone classification of nearby agents.
//!
//! A [`Zone`] is a range threshold, not an exclusive ring: classification
//! adds a neighbor to every zone whose range covers the distance, so an
//! adjacent agent appears in the Combat, Recognition, and Visual buckets
//! simultaneously under the default ranges.

use std::collections::BTreeMap;

use skirmish_types::{AgentId, Team, Vec2, ZoneKind};

use crate::agent::NeighborView;

/// One configured awareness zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    /// The zone's kind.
    pub kind: ZoneKind,
    /// Perception radius of the zone (>= 0).
    pub range: f64,
    /// Priority; lower numbers mean higher priority.
    pub priority: u8,
}

/// The configured set of awareness zones.
///
/// Defaults to Visual 150 / Recognition 100 / Combat 30 with priorities
/// 1 / 2 / 3 unless overridden by configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSet {
    zones: BTreeMap<ZoneKind, Zone>,
}

impl Default for ZoneSet {
    fn default() -> Self {
        Self::with_ranges(150.0, 100.0, 30.0)
    }
}

impl ZoneSet {
    /// Build a zone set with explicit Visual / Recognition / Combat ranges.
    pub fn with_ranges(visual: f64, recognition: f64, combat: f64) -> Self {
        let mut zones = BTreeMap::new();
        zones.insert(
            ZoneKind::Visual,
            Zone {
                kind: ZoneKind::Visual,
                range: visual,
                priority: 1,
            },
        );
        zones.insert(
            ZoneKind::Recognition,
            Zone {
                kind: ZoneKind::Recognition,
                range: recognition,
                priority: 2,
            },
        );
        zones.insert(
            ZoneKind::Combat,
            Zone {
                kind: ZoneKind::Combat,
                range: combat,
                priority: 3,
            },
        );
        Self { zones }
    }

    /// Add or replace a zone.
    pub fn set_zone(&mut self, zone: Zone) {
        self.zones.insert(zone.kind, zone);
    }

    /// Look up a zone by kind.
    pub fn get(&self, kind: ZoneKind) -> Option<&Zone> {
        self.zones.get(&kind)
    }

    /// Bucket every other live agent into the zones whose range covers
    /// its distance from `position`. The acting agent (`agent_id`) is
    /// excluded from all buckets.
    pub fn classify(
        &self,
        agent_id: AgentId,
        position: Vec2,
        neighbors: &[NeighborView],
    ) -> ZoneBuckets {
        let mut buckets: BTreeMap<ZoneKind, Vec<NeighborView>> = self
            .zones
            .keys()
            .map(|kind| (*kind, Vec::new()))
            .collect();

        for other in neighbors {
            if other.id == agent_id {
                continue;
            }

            let distance = other.position.distance(position);

            for zone in self.zones.values() {
                if distance <= zone.range {
                    if let Some(bucket) = buckets.get_mut(&zone.kind) {
                        bucket.push(*other);
                    }
                }
            }
        }

        ZoneBuckets { buckets }
    }
}

/// The result of zone classification: zone kind -> agents inside it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneBuckets {
    buckets: BTreeMap<ZoneKind, Vec<NeighborView>>,
}

impl ZoneBuckets {
    /// All agents inside the given zone.
    pub fn agents_in(&self, kind: ZoneKind) -> &[NeighborView] {
        self.buckets.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Agents inside the given zone on a different team than `team`.
    pub fn enemies_in(&self, kind: ZoneKind, team: Team) -> Vec<&NeighborView> {
        self.agents_in(kind)
            .iter()
            .filter(|a| a.team != team)
            .collect()
    }

    /// Agents inside the given zone on the same team as `team`.
    pub fn allies_in(&self, kind: ZoneKind, team: Team) -> Vec<&NeighborView> {
        self.agents_in(kind)
            .iter()
            .filter(|a| a.team == team)
            .collect()
    }
}

/// Mean position of a group of agents, or `None` for an empty group.
pub fn centroid_of(agents: &[&NeighborView]) -> Option<Vec2> {
    if agents.is_empty() {
        return None;
    }
    let sum = agents
        .iter()
        .fold(Vec2::ZERO, |acc, a| acc + a.position);
    Some(sum * (1.0 / agents.len() as f64))
}

/// The agent nearest to `from`, or `None` for an empty group.
pub fn nearest_to<'v>(agents: &[&'v NeighborView], from: Vec2) -> Option<&'v NeighborView> {
    agents
        .iter()
        .min_by(|a, b| {
            a.position
                .distance(from)
                .total_cmp(&b.position.distance(from))
        })
        .copied()
}
