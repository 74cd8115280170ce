//! Agent state, awareness zones, behaviors, and combat for the Skirmish
//! simulation.
//!
//! # Modules
//!
//! - [`agent`] -- the [`Agent`] record: physics, combat, and movement
//!   sub-state plus behavior bookkeeping.
//! - [`awareness`] -- perception zones and zone classification of nearby
//!   agents.
//! - [`context`] -- the per-agent, per-tick [`BehaviorContext`] with its
//!   derived tactical predicates.
//! - [`behavior`] -- the [`Behavior`] capability trait and the four
//!   built-in behaviors (Wander, Wander Together, Attack, Flee).
//! - [`custom`] -- operator-supplied steering programs: a declarative,
//!   capability-restricted replacement for runtime code loading.
//! - [`decision`] -- the priority cascade selecting a behavior from a
//!   context.
//! - [`system`] -- the [`BehaviorSystem`] orchestrating classification,
//!   decision, overrides, timers, and execution per agent.
//!
//! The flow each tick, per agent: classify neighbors into zones, build a
//! context, let the decision cascade (or an operator override) pick a
//! behavior, execute it for a steering force, and hand the force to
//! physics. Any evaluation fault yields a zero force for that agent only.

pub mod agent;
pub mod awareness;
pub mod behavior;
pub mod context;
pub mod custom;
pub mod decision;
pub mod system;

pub use agent::{Agent, CombatState, MovementProfile, NeighborView, PhysicsState};
pub use awareness::{Zone, ZoneBuckets, ZoneSet};
pub use behavior::Behavior;
pub use context::{AgentView, BehaviorContext};
pub use custom::{ProgramError, SteeringProgram};
pub use system::BehaviorSystem;
