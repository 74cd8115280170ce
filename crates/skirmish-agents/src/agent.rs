//! The [`Agent`] record and its physics, combat, and movement sub-state.
//!
//! Agents are owned by the simulation roster. Each one carries three
//! sub-records (physics, combat, movement), a weak `target_id` reference
//! that may dangle after the target dies (lookups treat a miss as "no
//! target"), and the behavior bookkeeping the decision engine maintains.

use rand::Rng;
use serde::{Deserialize, Serialize};

use skirmish_types::snapshot::AgentSnapshot;
use skirmish_types::{AgentId, BehaviorKind, Team, Vec2};

/// Health fraction below which an agent counts as low-health.
pub const LOW_HEALTH_PERCENT: f64 = 30.0;

/// Kinematic state of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsState {
    /// Current position in arena coordinates.
    pub position: Vec2,
    /// Current velocity, applied to position each tick.
    pub velocity: Vec2,
    /// Accumulated acceleration, zeroed after each integration step.
    pub acceleration: Vec2,
    /// Collision radius.
    pub radius: f64,
    /// Force queued by the behavior engine, consumed on the next
    /// integration step.
    pub pending_force: Option<Vec2>,
}

impl PhysicsState {
    /// Create kinematic state at a position with the given initial velocity.
    pub const fn new(position: Vec2, velocity: Vec2, radius: f64) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec2::ZERO,
            radius,
            pending_force: None,
        }
    }

    /// Accumulate a force into the acceleration.
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Integrate one step: consume the pending force, clamp velocity to
    /// `max_speed`, advance position, and zero the acceleration.
    pub fn integrate(&mut self, max_speed: f64) {
        if let Some(force) = self.pending_force.take() {
            self.apply_force(force);
        }
        self.velocity = (self.velocity + self.acceleration).limit(max_speed);
        self.position += self.velocity;
        self.acceleration = Vec2::ZERO;
    }
}

/// Combat state of one agent.
///
/// Invariant: `0 <= health <= max_health`; the agent is alive iff
/// `health > 0`. Cooldown timestamps are simulation seconds derived from
/// the tick clock, never wall-clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    /// Upper bound on health.
    pub max_health: f64,
    /// Current health.
    pub health: f64,
    /// Damage dealt per successful attack.
    pub attack_damage: f64,
    /// Maximum distance at which an attack can land.
    pub attack_range: f64,
    /// Minimum simulation seconds between attacks.
    pub attack_cooldown: f64,
    /// Simulation time of the most recent attack.
    pub last_attack_at: f64,
}

impl CombatState {
    /// Whether the agent is alive.
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Whether the attack cooldown has elapsed at simulation time `now`.
    pub fn can_attack(&self, now: f64) -> bool {
        now - self.last_attack_at >= self.attack_cooldown
    }

    /// Apply damage, flooring health at zero. Returns whether the hit
    /// was fatal.
    pub fn apply_damage(&mut self, damage: f64) -> bool {
        self.health = (self.health - damage).max(0.0);
        !self.is_alive()
    }

    /// Current health as a percentage of maximum (0 when max is zero).
    pub fn health_percentage(&self) -> f64 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            self.health / self.max_health * 100.0
        }
    }
}

/// Movement capabilities of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementProfile {
    /// Velocity magnitude cap.
    pub max_speed: f64,
    /// Steering force magnitude cap.
    pub max_force: f64,
    /// Turn-rate parameter from configuration (reserved for heading-based
    /// steering variants).
    pub turn_speed: f64,
    /// General awareness radius carried from configuration.
    pub awareness_radius: f64,
    /// Fine perception radius carried from configuration.
    pub perception_radius: f64,
}

/// A read-only projection of another agent, as seen by perception.
///
/// Built once per tick for every live agent and handed to zone
/// classification and behaviors; behaviors never see another agent's
/// mutable state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborView {
    /// The observed agent's identifier.
    pub id: AgentId,
    /// The observed agent's team.
    pub team: Team,
    /// The observed agent's position.
    pub position: Vec2,
    /// The observed agent's current health.
    pub health: f64,
}

/// One autonomous agent in the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier.
    pub id: AgentId,
    /// The agent's team.
    pub team: Team,
    /// Kinematic sub-state.
    pub physics: PhysicsState,
    /// Combat sub-state.
    pub combat: CombatState,
    /// Movement capabilities.
    pub movement: MovementProfile,
    /// Weak reference to the current target. May dangle once the target
    /// dies; every dereference resolves against the live roster and
    /// treats a miss as "no target".
    pub target_id: Option<AgentId>,
    /// Persistent wander heading in radians.
    pub wander_angle: f64,
    /// The behavior selected on the most recent evaluation.
    pub current_behavior: BehaviorKind,
    /// Ticks spent in the current behavior (reset on change).
    pub behavior_timer: u64,
}

impl Agent {
    /// Spawn a new agent at `position` with randomized combat and
    /// movement rolls: attack damage in [10, 20), max speed in [2, 4),
    /// initial velocity components in [-1, 1), and a random wander
    /// heading.
    ///
    /// `now` is the current simulation time; the attack cooldown starts
    /// from spawn.
    pub fn spawn(team: Team, position: Vec2, now: f64, rng: &mut impl Rng) -> Self {
        Self {
            id: AgentId::new(),
            team,
            physics: PhysicsState::new(
                position,
                Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)),
                10.0,
            ),
            combat: CombatState {
                max_health: 100.0,
                health: 100.0,
                attack_damage: rng.random_range(10.0..20.0),
                attack_range: 30.0,
                attack_cooldown: 1.0,
                last_attack_at: now,
            },
            movement: MovementProfile {
                max_speed: rng.random_range(2.0..4.0),
                max_force: 0.5,
                turn_speed: 0.1,
                awareness_radius: 100.0,
                perception_radius: 50.0,
            },
            target_id: None,
            wander_angle: rng.random_range(0.0..std::f64::consts::TAU),
            current_behavior: BehaviorKind::Wander,
            behavior_timer: 0,
        }
    }

    /// Whether the agent is alive.
    pub fn is_alive(&self) -> bool {
        self.combat.is_alive()
    }

    /// Current position.
    pub const fn position(&self) -> Vec2 {
        self.physics.position
    }

    /// Build the read-only perception projection of this agent.
    pub const fn view(&self) -> NeighborView {
        NeighborView {
            id: self.id,
            team: self.team,
            position: self.physics.position,
            health: self.combat.health,
        }
    }

    /// Project the agent into its wire representation.
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            team: self.team,
            position: self.physics.position,
            velocity: self.physics.velocity,
            health: self.combat.health,
            behavior: self.current_behavior,
            target_id: self.target_id,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    fn spawn_agent(seed: u64) -> Agent {
        let mut rng = SmallRng::seed_from_u64(seed);
        Agent::spawn(Team::Red, Vec2::new(100.0, 100.0), 0.0, &mut rng)
    }

    #[test]
    fn spawn_rolls_stay_in_range() {
        for seed in 0..16 {
            let agent = spawn_agent(seed);
            assert!(agent.combat.attack_damage >= 10.0 && agent.combat.attack_damage < 20.0);
            assert!(agent.movement.max_speed >= 2.0 && agent.movement.max_speed < 4.0);
            assert!(agent.physics.velocity.x >= -1.0 && agent.physics.velocity.x < 1.0);
            assert!(agent.wander_angle >= 0.0 && agent.wander_angle < std::f64::consts::TAU);
        }
    }

    #[test]
    fn damage_floors_at_zero() {
        let mut agent = spawn_agent(1);
        let fatal = agent.combat.apply_damage(250.0);
        assert!(fatal);
        assert_eq!(agent.combat.health, 0.0);
        assert!(!agent.is_alive());
    }

    #[test]
    fn non_fatal_damage_reports_survival() {
        let mut agent = spawn_agent(1);
        let fatal = agent.combat.apply_damage(30.0);
        assert!(!fatal);
        assert_eq!(agent.combat.health, 70.0);
        assert!((agent.combat.health_percentage() - 70.0).abs() < 1e-9);
    }

    #[test]
    fn cooldown_gates_attacks() {
        let mut agent = spawn_agent(2);
        agent.combat.attack_cooldown = 1.0;
        agent.combat.last_attack_at = 5.0;

        assert!(!agent.combat.can_attack(5.5));
        assert!(agent.combat.can_attack(6.0));
        assert!(agent.combat.can_attack(8.0));
    }

    #[test]
    fn zero_cooldown_always_ready() {
        let mut agent = spawn_agent(2);
        agent.combat.attack_cooldown = 0.0;
        agent.combat.last_attack_at = 5.0;
        assert!(agent.combat.can_attack(5.0));
    }

    #[test]
    fn integrate_clamps_velocity_and_clears_force() {
        let mut physics = PhysicsState::new(Vec2::ZERO, Vec2::ZERO, 10.0);
        physics.pending_force = Some(Vec2::new(100.0, 0.0));

        physics.integrate(3.0);

        assert!(physics.pending_force.is_none());
        assert_eq!(physics.acceleration, Vec2::ZERO);
        assert!((physics.velocity.magnitude() - 3.0).abs() < 1e-9);
        assert_eq!(physics.position, physics.velocity);
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut agent = spawn_agent(3);
        agent.current_behavior = BehaviorKind::Attack;

        let snap = agent.snapshot();
        assert_eq!(snap.id, agent.id);
        assert_eq!(snap.behavior, BehaviorKind::Attack);
        assert_eq!(snap.health, agent.combat.health);
    }
}
