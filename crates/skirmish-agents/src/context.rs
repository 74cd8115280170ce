//! The per-agent, per-tick [`BehaviorContext`] and its derived
//! tactical predicates.
//!
//! A context is ephemeral: built once per agent per tick from the zone
//! classification, consumed by the decision cascade and the chosen
//! behavior, then dropped. It has no persisted identity.

use skirmish_types::{AgentId, BehaviorKind, Team, Vec2, ZoneKind};

use crate::agent::{Agent, NeighborView, LOW_HEALTH_PERCENT};
use crate::awareness::ZoneBuckets;

/// Health percentage above which a pursuing agent keeps chasing.
const PURSUE_HEALTH_PERCENT: f64 = 50.0;

/// A read-only view of the acting agent, handed to steering programs.
///
/// Custom programs never receive the mutable [`Agent`]; this projection
/// is the whole of their authority over the actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentView {
    /// The acting agent's identifier.
    pub id: AgentId,
    /// The acting agent's team.
    pub team: Team,
    /// The acting agent's position.
    pub position: Vec2,
    /// The acting agent's health percentage.
    pub health_percentage: f64,
    /// The acting agent's steering force cap.
    pub max_force: f64,
}

/// Everything a behavior needs to produce a steering force for one agent
/// on one tick.
pub struct BehaviorContext<'a> {
    /// The acting agent. Behaviors may update its wander heading and
    /// target; they never touch other agents.
    pub agent: &'a mut Agent,
    /// Nearby live agents bucketed by zone.
    pub buckets: ZoneBuckets,
    /// The behavior recorded before this evaluation.
    pub current_behavior: BehaviorKind,
    /// Ticks the agent has spent in `current_behavior`.
    pub time_in_behavior: u64,
}

impl BehaviorContext<'_> {
    /// Enemies of the acting agent inside the given zone.
    pub fn enemies_in(&self, kind: ZoneKind) -> Vec<&NeighborView> {
        self.buckets.enemies_in(kind, self.agent.team)
    }

    /// Allies of the acting agent inside the given zone.
    pub fn allies_in(&self, kind: ZoneKind) -> Vec<&NeighborView> {
        self.buckets.allies_in(kind, self.agent.team)
    }

    /// The acting agent's health percentage.
    pub fn health_percentage(&self) -> f64 {
        self.agent.combat.health_percentage()
    }

    /// Whether Recognition-zone enemies outnumber allies by more than one.
    pub fn is_outnumbered(&self) -> bool {
        let enemies = self.enemies_in(ZoneKind::Recognition).len();
        let allies = self.allies_in(ZoneKind::Recognition).len();
        enemies > allies.saturating_add(1)
    }

    /// Whether health has dropped below the low-health threshold (30%).
    pub fn has_low_health(&self) -> bool {
        self.health_percentage() < LOW_HEALTH_PERCENT
    }

    /// Whether any ally is inside the Recognition zone.
    pub fn has_allies_nearby(&self) -> bool {
        !self.allies_in(ZoneKind::Recognition).is_empty()
    }

    /// Whether any enemy is inside the Combat zone.
    pub fn can_engage_combat(&self) -> bool {
        !self.enemies_in(ZoneKind::Combat).is_empty()
    }

    /// Whether the agent should chase a Visual-zone enemy: one is
    /// visible, none is engageable, and health is above 50%.
    pub fn should_pursue(&self) -> bool {
        !self.enemies_in(ZoneKind::Visual).is_empty()
            && !self.can_engage_combat()
            && self.health_percentage() > PURSUE_HEALTH_PERCENT
    }

    /// Build the read-only projection of the acting agent for steering
    /// programs.
    pub fn agent_view(&self) -> AgentView {
        AgentView {
            id: self.agent.id,
            team: self.agent.team,
            position: self.agent.physics.position,
            health_percentage: self.health_percentage(),
            max_force: self.agent.movement.max_force,
        }
    }
}
