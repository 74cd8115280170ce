//! The [`BehaviorSystem`]: per-agent orchestration of classification,
//! decision, overrides, timers, and behavior execution.
//!
//! The system owns the configured zones, operator overrides, and the
//! custom steering-program registry. It is consulted once per agent per
//! tick and returns the steering force physics will consume. Any fault
//! during evaluation yields a zero force for that agent only; the tick
//! never halts on a misbehaving agent.

use std::collections::BTreeMap;

use rand::RngCore;
use tracing::{debug, warn};

use skirmish_types::snapshot::BehaviorInfo;
use skirmish_types::{AgentId, BehaviorKind, Vec2};

use crate::agent::{Agent, NeighborView};
use crate::awareness::ZoneSet;
use crate::behavior::{self, Behavior, WanderBehavior};
use crate::context::BehaviorContext;
use crate::custom::{ProgramError, SteeringProgram};
use crate::decision;

/// An operator-imposed behavior assignment for one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BehaviorOverride {
    /// Always run this built-in behavior, skipping the decision cascade.
    Forced(BehaviorKind),
    /// Run the named steering program.
    Program(String),
}

/// What the system chose to execute for an agent this tick.
enum Choice {
    /// A built-in behavior kind.
    BuiltIn(BehaviorKind),
    /// A registered steering program.
    Program(String),
}

/// Orchestrates behavior evaluation for every agent.
#[derive(Debug, Clone, Default)]
pub struct BehaviorSystem {
    /// The configured awareness zones.
    zones: ZoneSet,
    /// Operator overrides keyed by agent.
    overrides: BTreeMap<AgentId, BehaviorOverride>,
    /// Registered steering programs keyed by program id.
    programs: BTreeMap<String, SteeringProgram>,
}

impl BehaviorSystem {
    /// Create a behavior system with the given zone configuration.
    pub fn new(zones: ZoneSet) -> Self {
        Self {
            zones,
            overrides: BTreeMap::new(),
            programs: BTreeMap::new(),
        }
    }

    /// The configured zones.
    pub const fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    /// Replace the zone configuration (applied on configuration load).
    pub fn set_zones(&mut self, zones: ZoneSet) {
        self.zones = zones;
    }

    /// Impose an override on an agent, replacing any previous one.
    pub fn set_override(&mut self, agent_id: AgentId, assignment: BehaviorOverride) {
        debug!(agent_id = %agent_id, ?assignment, "Behavior override set");
        self.overrides.insert(agent_id, assignment);
    }

    /// Remove an agent's override, restoring the decision cascade.
    pub fn clear_override(&mut self, agent_id: AgentId) {
        self.overrides.remove(&agent_id);
    }

    /// Register (or replace) a steering program under an id.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramError`] when the program fails validation; the
    /// registry is left untouched in that case.
    pub fn register_program(
        &mut self,
        id: impl Into<String>,
        program: SteeringProgram,
    ) -> Result<(), ProgramError> {
        program.validate()?;
        let id = id.into();
        debug!(program = %id, terms = program.terms.len(), "Steering program registered");
        self.programs.insert(id, program);
        Ok(())
    }

    /// Point an agent at a registered program. Returns `false` when no
    /// program with that id exists (the agent is left unchanged).
    pub fn assign_program(&mut self, agent_id: AgentId, program_id: &str) -> bool {
        if !self.programs.contains_key(program_id) {
            warn!(agent_id = %agent_id, program = %program_id, "Unknown steering program");
            return false;
        }
        self.set_override(agent_id, BehaviorOverride::Program(program_id.to_owned()));
        true
    }

    /// Drop all bookkeeping for an agent that left the roster.
    pub fn forget_agent(&mut self, agent_id: AgentId) {
        self.overrides.remove(&agent_id);
    }

    /// List every available behavior: the built-ins followed by the
    /// registered custom programs.
    pub fn available_behaviors(&self) -> Vec<BehaviorInfo> {
        let mut behaviors: Vec<BehaviorInfo> = BehaviorKind::BUILT_IN
            .iter()
            .map(|kind| BehaviorInfo {
                id: kind.as_str().to_owned(),
                name: kind.display_name().to_owned(),
                kind: String::from("default"),
            })
            .collect();

        for (id, program) in &self.programs {
            behaviors.push(BehaviorInfo {
                id: id.clone(),
                name: program
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("Custom Behavior {id}")),
                kind: String::from("custom"),
            });
        }

        behaviors
    }

    /// The current behavior assignments, keyed by agent id.
    pub fn assignments(&self) -> BTreeMap<String, String> {
        self.overrides
            .iter()
            .map(|(agent_id, assignment)| {
                let label = match assignment {
                    BehaviorOverride::Forced(kind) => kind.as_str().to_owned(),
                    BehaviorOverride::Program(id) => id.clone(),
                };
                (agent_id.to_string(), label)
            })
            .collect()
    }

    /// Evaluate and execute one agent's behavior for this tick.
    ///
    /// Classifies neighbors into zones, lets the decision cascade (or an
    /// override) pick the behavior, maintains the behavior-change timer,
    /// and executes the choice. Faults -- an unknown program, a program
    /// evaluation failure, or a non-finite force -- degrade to wandering
    /// or a zero force for this agent only.
    pub fn update(
        &self,
        agent: &mut Agent,
        neighbors: &[NeighborView],
        rng: &mut dyn RngCore,
    ) -> Vec2 {
        let agent_id = agent.id;
        let previous = agent.current_behavior;
        let timer = agent.behavior_timer;

        let buckets = self
            .zones
            .classify(agent_id, agent.physics.position, neighbors);

        let mut ctx = BehaviorContext {
            agent,
            buckets,
            current_behavior: previous,
            time_in_behavior: timer,
        };

        let choice = match self.overrides.get(&agent_id) {
            Some(BehaviorOverride::Forced(kind)) => Choice::BuiltIn(*kind),
            Some(BehaviorOverride::Program(id)) => Choice::Program(id.clone()),
            None => Choice::BuiltIn(decision::evaluate(&ctx)),
        };

        let chosen_kind = match &choice {
            Choice::BuiltIn(kind) => *kind,
            Choice::Program(_) => BehaviorKind::Custom,
        };

        if chosen_kind == previous {
            ctx.agent.behavior_timer = ctx.agent.behavior_timer.saturating_add(1);
        } else {
            debug!(agent_id = %agent_id, from = %previous, to = %chosen_kind, "Behavior change");
            ctx.agent.behavior_timer = 0;
        }
        ctx.agent.current_behavior = chosen_kind;

        let force = match choice {
            Choice::BuiltIn(kind) => behavior::built_in(kind).map_or_else(
                || {
                    warn!(agent_id = %agent_id, kind = %kind, "No executable behavior for kind");
                    Vec2::ZERO
                },
                |b| b.execute(&mut ctx, rng),
            ),
            Choice::Program(id) => match self.programs.get(&id) {
                Some(program) => {
                    let view = ctx.agent_view();
                    program
                        .evaluate(&view, &ctx.buckets, rng)
                        .unwrap_or_else(|| {
                            warn!(agent_id = %agent_id, program = %id, "Steering program produced a non-finite force, wandering");
                            WanderBehavior.execute(&mut ctx, rng)
                        })
                }
                None => {
                    warn!(agent_id = %agent_id, program = %id, "Assigned steering program missing, wandering");
                    WanderBehavior.execute(&mut ctx, rng)
                }
            },
        };

        if force.is_finite() {
            force
        } else {
            warn!(agent_id = %agent_id, behavior = %chosen_kind, "Behavior produced a non-finite force, substituting zero");
            Vec2::ZERO
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use skirmish_types::{Team, ZoneKind};

    use crate::custom::{SteeringRule, SteeringTerm};

    use super::*;

    fn make_agent(team: Team) -> Agent {
        let mut rng = SmallRng::seed_from_u64(30);
        Agent::spawn(team, Vec2::ZERO, 0.0, &mut rng)
    }

    fn neighbor(team: Team, x: f64) -> NeighborView {
        NeighborView {
            id: AgentId::new(),
            team,
            position: Vec2::new(x, 0.0),
            health: 100.0,
        }
    }

    #[test]
    fn isolated_agent_always_wanders() {
        let system = BehaviorSystem::default();
        let mut agent = make_agent(Team::Red);
        let mut rng = SmallRng::seed_from_u64(31);

        for _ in 0..10 {
            let force = system.update(&mut agent, &[], &mut rng);
            assert_eq!(agent.current_behavior, BehaviorKind::Wander);
            assert!(
                (force.magnitude() - agent.movement.max_force).abs() < 1e-9,
                "wander force magnitude must equal max_force"
            );
        }
    }

    #[test]
    fn low_health_with_ally_still_flees() {
        let system = BehaviorSystem::default();
        let mut agent = make_agent(Team::Red);
        agent.combat.health = 20.0;
        let neighbors = [neighbor(Team::Red, 10.0), neighbor(Team::Blue, 50.0)];
        let mut rng = SmallRng::seed_from_u64(32);

        let _ = system.update(&mut agent, &neighbors, &mut rng);
        assert_eq!(agent.current_behavior, BehaviorKind::Flee);
    }

    #[test]
    fn behavior_timer_resets_on_change_and_increments_otherwise() {
        let system = BehaviorSystem::default();
        let mut agent = make_agent(Team::Red);
        let mut rng = SmallRng::seed_from_u64(33);

        // Spawn default is Wander; an empty arena keeps it that way.
        let _ = system.update(&mut agent, &[], &mut rng);
        assert_eq!(agent.behavior_timer, 1);
        let _ = system.update(&mut agent, &[], &mut rng);
        assert_eq!(agent.behavior_timer, 2);

        // An enemy appears: behavior flips to Attack, timer resets.
        let enemies = [neighbor(Team::Blue, 100.0)];
        let _ = system.update(&mut agent, &enemies, &mut rng);
        assert_eq!(agent.current_behavior, BehaviorKind::Attack);
        assert_eq!(agent.behavior_timer, 0);

        let _ = system.update(&mut agent, &enemies, &mut rng);
        assert_eq!(agent.behavior_timer, 1);
    }

    #[test]
    fn forced_override_skips_the_cascade() {
        let mut system = BehaviorSystem::default();
        let mut agent = make_agent(Team::Red);
        let mut rng = SmallRng::seed_from_u64(34);

        system.set_override(agent.id, BehaviorOverride::Forced(BehaviorKind::Flee));

        // No enemies in sight: the cascade would pick Wander, but the
        // override forces Flee (which yields zero force with no danger).
        let force = system.update(&mut agent, &[], &mut rng);
        assert_eq!(agent.current_behavior, BehaviorKind::Flee);
        assert_eq!(force, Vec2::ZERO);

        system.clear_override(agent.id);
        let _ = system.update(&mut agent, &[], &mut rng);
        assert_eq!(agent.current_behavior, BehaviorKind::Wander);
    }

    #[test]
    fn registered_program_drives_the_agent() {
        let mut system = BehaviorSystem::default();
        let mut agent = make_agent(Team::Red);
        let mut rng = SmallRng::seed_from_u64(35);

        let program = SteeringProgram {
            name: Some(String::from("hunter")),
            terms: vec![SteeringRule {
                term: SteeringTerm::SeekNearestEnemy {
                    zone: ZoneKind::Visual,
                },
                weight: 1.0,
            }],
        };
        system.register_program("hunter-1", program).unwrap();
        assert!(system.assign_program(agent.id, "hunter-1"));

        let enemy = [neighbor(Team::Blue, 100.0)];
        let force = system.update(&mut agent, &enemy, &mut rng);

        assert_eq!(agent.current_behavior, BehaviorKind::Custom);
        assert!(force.x > 0.0, "program should seek the enemy at +X");
    }

    #[test]
    fn invalid_program_is_rejected_at_registration() {
        let mut system = BehaviorSystem::default();
        let empty = SteeringProgram {
            name: None,
            terms: Vec::new(),
        };
        assert!(system.register_program("bad", empty).is_err());
        assert!(!system.assign_program(AgentId::new(), "bad"));
    }

    #[test]
    fn available_behaviors_lists_built_ins_then_customs() {
        let mut system = BehaviorSystem::default();
        let program = SteeringProgram {
            name: None,
            terms: vec![SteeringRule {
                term: SteeringTerm::Wander,
                weight: 1.0,
            }],
        };
        system.register_program("custom-7", program).unwrap();

        let behaviors = system.available_behaviors();
        assert_eq!(behaviors.len(), 5);
        assert_eq!(behaviors.first().map(|b| b.id.as_str()), Some("wander"));
        let custom = behaviors.last().unwrap();
        assert_eq!(custom.id, "custom-7");
        assert_eq!(custom.kind, "custom");
        assert_eq!(custom.name, "Custom Behavior custom-7");
    }

    #[test]
    fn forgetting_an_agent_drops_its_override() {
        let mut system = BehaviorSystem::default();
        let agent_id = AgentId::new();
        system.set_override(agent_id, BehaviorOverride::Forced(BehaviorKind::Attack));
        assert_eq!(system.assignments().len(), 1);

        system.forget_agent(agent_id);
        assert!(system.assignments().is_empty());
    }
}
