//! Serialized wire types produced by the core for the transport layer.
//!
//! These structs define the JSON the server speaks: per-agent and world
//! snapshots, team statistics, kill records, synchronizer delta entries,
//! and the tagged [`OutboundMessage`] envelope broadcast to every
//! connected client.

use serde::{Deserialize, Serialize};

use crate::enums::{BehaviorKind, Team};
use crate::ids::AgentId;
use crate::vec2::Vec2;

/// Per-agent snapshot broadcast once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// The agent's identifier.
    pub id: AgentId,
    /// The agent's team.
    pub team: Team,
    /// Current position in arena coordinates.
    pub position: Vec2,
    /// Current velocity.
    pub velocity: Vec2,
    /// Current health (0 ..= max health).
    pub health: f64,
    /// The behavior the agent executed this tick.
    pub behavior: BehaviorKind,
    /// The agent's current target, if any.
    pub target_id: Option<AgentId>,
}

/// A single wall in the serialized world layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallSnapshot {
    /// Human-readable wall name (e.g. `Corner-1`).
    pub name: String,
    /// Left edge of the wall.
    pub x: f64,
    /// Top edge of the wall.
    pub y: f64,
    /// Wall width.
    pub width: f64,
    /// Wall height.
    pub height: f64,
}

/// The serialized world layout.
///
/// `holes` and `colines` are always empty today; the fields are carried
/// so the wire format stays stable when non-wall obstacles are added.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// All walls in the arena.
    pub walls: Vec<WallSnapshot>,
    /// Arena bounds as `[min_x, min_y, max_x, max_y]`.
    pub bounds: [f64; 4],
    /// Reserved for future non-wall obstacles.
    pub holes: Vec<serde_json::Value>,
    /// Reserved for future topological features.
    pub colines: Vec<serde_json::Value>,
}

/// Aggregate combat statistics for both teams.
///
/// Counters only move through the lifecycle helpers, which saturate
/// rather than wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamStats {
    /// Kills credited to the red team.
    pub red_kills: u32,
    /// Kills credited to the blue team.
    pub blue_kills: u32,
    /// Live red agents.
    pub red_agents: u32,
    /// Live blue agents.
    pub blue_agents: u32,
    /// Total agent deaths since the simulation started.
    pub total_deaths: u32,
}

impl TeamStats {
    /// Return the live-agent count for a team.
    pub const fn live_count(&self, team: Team) -> u32 {
        match team {
            Team::Red => self.red_agents,
            Team::Blue => self.blue_agents,
        }
    }

    /// Record a spawn for a team.
    pub const fn record_spawn(&mut self, team: Team) {
        match team {
            Team::Red => self.red_agents = self.red_agents.saturating_add(1),
            Team::Blue => self.blue_agents = self.blue_agents.saturating_add(1),
        }
    }

    /// Record a death, crediting the killer's team when known.
    pub const fn record_death(&mut self, victim: Team, killer: Option<Team>) {
        match victim {
            Team::Red => self.red_agents = self.red_agents.saturating_sub(1),
            Team::Blue => self.blue_agents = self.blue_agents.saturating_sub(1),
        }
        match killer {
            Some(Team::Red) => self.red_kills = self.red_kills.saturating_add(1),
            Some(Team::Blue) => self.blue_kills = self.blue_kills.saturating_add(1),
            None => {}
        }
        self.total_deaths = self.total_deaths.saturating_add(1);
    }
}

/// Live-agent counts per team, as broadcast in full state updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamCounts {
    /// Live red agents.
    pub red: u32,
    /// Live blue agents.
    pub blue: u32,
}

/// A kill that happened during the current tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillRecord {
    /// The agent that died.
    pub victim_id: AgentId,
    /// The victim's team.
    pub victim_team: Team,
    /// The team credited with the kill, when attribution succeeded.
    pub killer_team: Option<Team>,
}

/// Ledger entry for an agent removed from the live roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadAgent {
    /// The dead agent's identifier.
    pub id: AgentId,
    /// The dead agent's team.
    pub team: Team,
    /// The team credited with the kill, when attribution succeeded.
    pub killer_team: Option<Team>,
    /// The tick on which the agent died.
    pub died_at_tick: u64,
}

/// One container's entry in a synchronizer delta update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaEntry {
    /// The container's current value, serialized to JSON.
    pub value: serde_json::Value,
    /// The synchronizer's version counter for this container.
    pub version: u64,
    /// Unix timestamp (seconds) of the last synchronization.
    pub timestamp: f64,
}

/// The per-tick game update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameUpdate {
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    /// Snapshot of every live agent.
    pub agents: Vec<AgentSnapshot>,
    /// Current team statistics.
    pub stats: TeamStats,
}

/// Payload broadcast when one or more kills happened in a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEvent {
    /// The kills that occurred this tick.
    pub kills: Vec<KillRecord>,
    /// Current team statistics.
    pub stats: TeamStats,
}

/// The full state update sent on connection and after commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullState {
    /// Whether the simulation loop is currently ticking.
    pub is_running: bool,
    /// Live-agent counts per team.
    pub team_counts: TeamCounts,
    /// Current team statistics.
    pub stats: TeamStats,
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    /// The serialized world layout.
    pub world: WorldSnapshot,
    /// The active configuration parameters, when one is loaded.
    pub config: Option<serde_json::Value>,
}

/// An entry in the list of available behaviors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorInfo {
    /// Behavior identifier (built-in kind name or custom program id).
    pub id: String,
    /// Human-readable behavior name.
    pub name: String,
    /// Either `"default"` or `"custom"`.
    #[serde(rename = "type")]
    pub kind: String,
}

/// The tagged message envelope broadcast to transport clients.
///
/// Serializes as `{"type": "<tag>", "data": {...}}`, matching the wire
/// format the presentation client consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Per-tick agent/stats update.
    GameUpdate(GameUpdate),
    /// Kills that happened this tick.
    CombatEvent(CombatEvent),
    /// Full state after connection or a state-changing command.
    GameState(FullState),
    /// Synchronizer delta keyed by container id.
    StateUpdate(std::collections::BTreeMap<String, DeltaEntry>),
    /// Result of a custom-behavior update command.
    BehaviorUpdate {
        /// The agent whose behavior assignment changed.
        agent_id: AgentId,
        /// `"success"` or `"error"`.
        status: String,
        /// Error detail when `status` is `"error"`.
        message: Option<String>,
    },
    /// The list of available behaviors.
    BehaviorList {
        /// Built-in behaviors followed by custom programs.
        behaviors: Vec<BehaviorInfo>,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn team_stats_record_death_updates_all_counters() {
        let mut stats = TeamStats::default();
        stats.record_spawn(Team::Red);
        stats.record_spawn(Team::Blue);

        stats.record_death(Team::Blue, Some(Team::Red));

        assert_eq!(stats.red_kills, 1);
        assert_eq!(stats.blue_kills, 0);
        assert_eq!(stats.red_agents, 1);
        assert_eq!(stats.blue_agents, 0);
        assert_eq!(stats.total_deaths, 1);
    }

    #[test]
    fn record_death_without_killer_skips_kill_credit() {
        let mut stats = TeamStats::default();
        stats.record_spawn(Team::Red);
        stats.record_death(Team::Red, None);

        assert_eq!(stats.red_kills, 0);
        assert_eq!(stats.blue_kills, 0);
        assert_eq!(stats.total_deaths, 1);
    }

    #[test]
    fn live_counts_never_underflow() {
        let mut stats = TeamStats::default();
        stats.record_death(Team::Red, None);
        assert_eq!(stats.red_agents, 0);
    }

    #[test]
    fn outbound_message_envelope_shape() {
        let msg = OutboundMessage::CombatEvent(CombatEvent {
            kills: Vec::new(),
            stats: TeamStats::default(),
        });
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json.get("type").and_then(|v| v.as_str()), Some("combat_event"));
        assert!(json.get("data").is_some());
    }

    #[test]
    fn behavior_info_uses_type_key() {
        let info = BehaviorInfo {
            id: String::from("wander"),
            name: String::from("Wander"),
            kind: String::from("default"),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json.get("type").and_then(|v| v.as_str()), Some("default"));
    }

    #[test]
    fn world_snapshot_carries_empty_reserved_fields() {
        let json = serde_json::to_value(WorldSnapshot::default()).unwrap();
        assert_eq!(json.get("holes"), Some(&serde_json::json!([])));
        assert_eq!(json.get("colines"), Some(&serde_json::json!([])));
    }
}
