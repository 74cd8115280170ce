//! [`SimulationState`] and the tick cycle.
//!
//! Each tick runs four phases in fixed order:
//!
//! 1. **Behavior** -- every live agent perceives its neighbors, the
//!    decision cascade (or an operator override) picks a behavior, and
//!    the resulting steering force is queued on the agent.
//! 2. **Physics** -- the two-pass integrate-then-resolve sweep moves all
//!    agents against the arena walls.
//! 3. **Combat** -- one attack attempt per agent: an agent strikes when
//!    its target resolves to a live roster member within attack range
//!    and the cooldown has elapsed.
//! 4. **Lifecycle & sync** -- agents at zero health are removed with
//!    kill attribution, and the tick's mutations are published to the
//!    state containers and swept by the synchronizer.
//!
//! The roster, arena, statistics, and containers are all owned here:
//! [`SimulationState`] is the single coordinator the loop and the
//! command handlers share, one mutation at a time.

use std::collections::{BTreeMap, VecDeque};

use rand::rngs::StdRng;
use rand::SeedableRng as _;
use tracing::{debug, info, warn};

use skirmish_agents::custom::ProgramError;
use skirmish_agents::system::BehaviorOverride;
use skirmish_agents::{Agent, BehaviorSystem, NeighborView, SteeringProgram};
use skirmish_types::snapshot::{
    AgentSnapshot, DeadAgent, FullState, KillRecord, TeamCounts, TeamStats,
};
use skirmish_types::{AgentId, BehaviorKind, Team, Vec2};
use skirmish_world::{Arena, WorldError};

use crate::clock::{ClockError, TickClock};
use crate::config::{AgentParameters, SimulationConfig};
use crate::physics;
use crate::sync::{StateStore, Synchronizer};

/// Retention cap on the dead-agent ledger.
const DEAD_LEDGER_CAP: usize = 256;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Errors produced by state-mutating commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The referenced agent is not in the live roster.
    #[error("agent {agent_id} is not in the roster")]
    UnknownAgent {
        /// The missing agent's id.
        agent_id: AgentId,
    },

    /// The submitted steering program failed validation.
    #[error("invalid steering program: {source}")]
    Program {
        /// The underlying validation error.
        #[from]
        source: ProgramError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Number of live agents at end of tick.
    pub agents_alive: u32,
    /// Kills that happened during this tick.
    pub kills: Vec<KillRecord>,
}

/// The complete mutable simulation state.
///
/// Owned behind one coarse lock shared by the tick loop and the command
/// handlers; every mutation path runs to completion under that lock.
#[derive(Debug)]
pub struct SimulationState {
    /// The simulation clock.
    pub clock: TickClock,
    /// The arena (bounds and walls).
    pub arena: Arena,
    /// The live agents, keyed by id.
    pub roster: BTreeMap<AgentId, Agent>,
    /// The behavior engine (zones, overrides, steering programs).
    pub behavior_system: BehaviorSystem,
    /// Aggregate combat statistics.
    pub stats: TeamStats,
    /// Kills recorded during the current tick.
    pub recent_kills: Vec<KillRecord>,
    /// Bounded ledger of removed agents, most recent last.
    pub dead_agents: VecDeque<DeadAgent>,
    /// The active configuration.
    pub config: SimulationConfig,
    /// The versioned state containers.
    pub store: StateStore,
    /// The delta-update synchronizer.
    pub synchronizer: Synchronizer,
    /// Simulation randomness (seeded from configuration).
    pub rng: StdRng,
}

impl SimulationState {
    /// Build a simulation from configuration: generate the arena, seed
    /// both teams, and publish the initial state to the containers.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError`] if the configured arena bounds are
    /// degenerate. Per the no-partial-state rule, any failure here is
    /// fatal to initialization -- the caller gets no half-built state.
    pub fn new(config: SimulationConfig) -> Result<Self, WorldError> {
        let mut rng = StdRng::seed_from_u64(config.world.seed);
        let arena = Arena::generate(config.world.bounds, config.world.num_walls, &mut rng)?;

        let mut state = Self {
            clock: TickClock::new(config.world.tick_interval_ms),
            arena,
            roster: BTreeMap::new(),
            behavior_system: BehaviorSystem::new(config.parameters.zone_set()),
            stats: TeamStats::default(),
            recent_kills: Vec::new(),
            dead_agents: VecDeque::new(),
            config,
            store: StateStore::new(),
            synchronizer: Synchronizer::new(),
            rng,
        };

        state.seed_teams();
        state.store.set_world(state.arena.snapshot());
        state.publish_config();
        state.publish_combat();
        state.publish_agents();

        info!(
            walls = state.arena.walls().len(),
            agents = state.roster.len(),
            "Simulation state initialized"
        );
        Ok(state)
    }

    /// Spawn the configured number of agents for both teams.
    fn seed_teams(&mut self) {
        for team in [Team::Red, Team::Blue] {
            for _ in 0..self.config.world.agents_per_team {
                let _ = self.spawn_agent(team, None);
            }
        }
    }

    /// Add an agent to a team.
    ///
    /// Uses the provided spawn position when given; otherwise samples a
    /// wall-free position (center fallback). Updates the roster and the
    /// team counters, and publishes both containers within this call.
    pub fn spawn_agent(&mut self, team: Team, position: Option<Vec2>) -> AgentId {
        let position = match position {
            Some(p) => p,
            None => self.arena.random_free_position(&mut self.rng),
        };

        let mut agent = Agent::spawn(team, position, self.clock.seconds(), &mut self.rng);
        self.config.parameters.apply_to_agent(&mut agent);

        let id = agent.id;
        self.roster.insert(id, agent);
        self.stats.record_spawn(team);

        self.publish_agents();
        self.publish_combat();

        info!(agent_id = %id, team = %team, x = position.x, y = position.y, "Agent spawned");
        id
    }

    /// Execute one complete tick.
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] if the clock cannot advance. Per-agent
    /// behavior faults never surface here; they degrade to a zero force
    /// inside the behavior system.
    pub fn run_tick(&mut self) -> Result<TickSummary, TickError> {
        self.clock.advance()?;
        let tick = self.clock.tick();
        let now = self.clock.seconds();
        self.recent_kills.clear();

        // --- Phase 1: behavior ---
        self.phase_behavior();

        // --- Phase 2: physics ---
        physics::step(&mut self.roster, &self.arena);

        // --- Phase 3: combat ---
        self.phase_combat(now);

        // --- Phase 4: lifecycle ---
        self.phase_lifecycle(tick);

        // --- Publish & synchronize ---
        self.publish_agents();
        if !self.recent_kills.is_empty() {
            self.publish_combat();
        }
        self.synchronizer.synchronize(&mut self.store);

        let agents_alive = u32::try_from(self.roster.len()).unwrap_or(u32::MAX);
        debug!(tick, agents_alive, kills = self.recent_kills.len(), "Tick completed");

        Ok(TickSummary {
            tick,
            agents_alive,
            kills: self.recent_kills.clone(),
        })
    }

    /// Phase 1: evaluate every agent's behavior and queue its force.
    fn phase_behavior(&mut self) {
        let views: Vec<NeighborView> = self.roster.values().map(Agent::view).collect();
        let ids: Vec<AgentId> = self.roster.keys().copied().collect();

        for id in &ids {
            let Some(agent) = self.roster.get_mut(id) else {
                continue;
            };
            let force = self.behavior_system.update(agent, &views, &mut self.rng);
            agent.physics.pending_force = Some(force);
        }
    }

    /// Phase 3: one attack attempt per agent.
    ///
    /// An agent attacks when its target resolves to a live agent in the
    /// current roster within attack range and its cooldown has elapsed.
    /// Dangling target references are treated as "no target". An agent
    /// killed earlier in the pass no longer attacks.
    fn phase_combat(&mut self, now: f64) {
        let ids: Vec<AgentId> = self.roster.keys().copied().collect();

        for id in &ids {
            let Some(attacker) = self.roster.get(id) else {
                continue;
            };
            if !attacker.is_alive() {
                continue;
            }
            let Some(target_id) = attacker.target_id else {
                continue;
            };
            if !attacker.combat.can_attack(now) {
                continue;
            }

            let Some(target) = self.roster.get(&target_id) else {
                // Stale reference: the target died on an earlier tick.
                continue;
            };
            if !target.is_alive() {
                continue;
            }
            if target.position().distance(attacker.position()) > attacker.combat.attack_range {
                continue;
            }

            let damage = attacker.combat.attack_damage;
            if let Some(attacker) = self.roster.get_mut(id) {
                attacker.combat.last_attack_at = now;
            }
            let fatal = self
                .roster
                .get_mut(&target_id)
                .is_some_and(|target| target.combat.apply_damage(damage));

            if fatal {
                debug!(attacker = %id, victim = %target_id, "Fatal hit");
            }
        }
    }

    /// Phase 4: remove dead agents with kill attribution.
    ///
    /// The victim's target (resolved against the agents present this
    /// tick) supplies the killer's team. Removed ids never survive as
    /// live targets: later lookups simply miss the roster.
    fn phase_lifecycle(&mut self, tick: u64) {
        let dead_ids: Vec<AgentId> = self
            .roster
            .values()
            .filter(|agent| !agent.is_alive())
            .map(|agent| agent.id)
            .collect();

        for victim_id in dead_ids {
            let killer_team = self
                .roster
                .get(&victim_id)
                .and_then(|victim| victim.target_id)
                .and_then(|target_id| self.roster.get(&target_id))
                .map(|killer| killer.team);

            let Some(victim) = self.roster.remove(&victim_id) else {
                continue;
            };

            self.stats.record_death(victim.team, killer_team);
            self.recent_kills.push(KillRecord {
                victim_id,
                victim_team: victim.team,
                killer_team,
            });
            self.dead_agents.push_back(DeadAgent {
                id: victim_id,
                team: victim.team,
                killer_team,
                died_at_tick: tick,
            });
            while self.dead_agents.len() > DEAD_LEDGER_CAP {
                self.dead_agents.pop_front();
            }
            self.behavior_system.forget_agent(victim_id);

            info!(
                victim = %victim_id,
                team = %victim.team,
                killer_team = ?killer_team,
                "Agent died"
            );
        }
    }

    /// Force a built-in behavior onto an agent.
    ///
    /// Returns `false` (with no mutation) when the agent does not exist
    /// or the kind is not executable as an override.
    pub fn force_behavior(&mut self, agent_id: AgentId, kind: BehaviorKind) -> bool {
        if kind == BehaviorKind::Custom {
            warn!(agent_id = %agent_id, "Custom cannot be forced directly; submit a program");
            return false;
        }
        if !self.roster.contains_key(&agent_id) {
            warn!(agent_id = %agent_id, "Cannot force behavior on unknown agent");
            return false;
        }

        self.behavior_system
            .set_override(agent_id, BehaviorOverride::Forced(kind));
        self.publish_behaviors();
        info!(agent_id = %agent_id, behavior = %kind, "Behavior forced");
        true
    }

    /// Register a steering program and assign it to an agent.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] when the program fails validation or the
    /// agent does not exist; nothing is mutated in that case.
    pub fn set_custom_behavior(
        &mut self,
        agent_id: AgentId,
        program_id: &str,
        program: SteeringProgram,
    ) -> Result<(), CommandError> {
        program.validate()?;
        if !self.roster.contains_key(&agent_id) {
            warn!(agent_id = %agent_id, "Cannot attach program to unknown agent");
            return Err(CommandError::UnknownAgent { agent_id });
        }

        self.behavior_system.register_program(program_id, program)?;
        let _ = self.behavior_system.assign_program(agent_id, program_id);
        self.publish_behaviors();
        info!(agent_id = %agent_id, program = %program_id, "Custom behavior attached");
        Ok(())
    }

    /// Apply new agent parameters: per-agent tunables, zone ranges, and
    /// the configuration container, all within this call.
    pub fn load_parameters(&mut self, parameters: AgentParameters) {
        for agent in self.roster.values_mut() {
            parameters.apply_to_agent(agent);
        }
        self.behavior_system.set_zones(parameters.zone_set());
        self.config.parameters = parameters;
        self.publish_config();
        info!("Configuration parameters applied");
    }

    /// Regenerate the world and reseed both teams.
    ///
    /// The roster, statistics, kill ledgers, and behavior overrides are
    /// discarded; the arena is rebuilt and fresh agents spawned. All
    /// affected containers are republished within this call.
    pub fn reset(&mut self) {
        self.roster.clear();
        self.stats = TeamStats::default();
        self.recent_kills.clear();
        self.dead_agents.clear();
        self.behavior_system = BehaviorSystem::new(self.config.parameters.zone_set());

        let num_walls = self.config.world.num_walls;
        self.arena.regenerate(num_walls, &mut self.rng);
        self.seed_teams();

        self.store.set_world(self.arena.snapshot());
        self.publish_combat();
        self.publish_agents();
        self.publish_behaviors();

        info!(
            walls = self.arena.walls().len(),
            agents = self.roster.len(),
            "Simulation reset"
        );
    }

    /// Snapshot every live agent for the wire.
    pub fn agent_snapshots(&self) -> Vec<AgentSnapshot> {
        self.roster.values().map(Agent::snapshot).collect()
    }

    /// Build the full state update payload.
    pub fn full_state(&self, is_running: bool) -> FullState {
        FullState {
            is_running,
            team_counts: TeamCounts {
                red: self.stats.red_agents,
                blue: self.stats.blue_agents,
            },
            stats: self.stats,
            timestamp: TickClock::timestamp_ms(),
            world: self.arena.snapshot(),
            config: self.store.config().clone(),
        }
    }

    /// Publish the roster snapshot to its container.
    fn publish_agents(&mut self) {
        let snapshots = self.agent_snapshots();
        self.store.set_agents(snapshots);
    }

    /// Publish the combat statistics to their container.
    fn publish_combat(&mut self) {
        self.store.set_combat(self.stats);
    }

    /// Publish the behavior assignments to their container.
    fn publish_behaviors(&mut self) {
        let assignments = self.behavior_system.assignments();
        self.store.set_behaviors(assignments);
    }

    /// Publish the active configuration parameters to their container.
    fn publish_config(&mut self) {
        match serde_json::to_value(&self.config.parameters) {
            Ok(value) => self.store.set_config(Some(value)),
            Err(error) => warn!(%error, "Failed to serialize configuration"),
        }
    }
}
