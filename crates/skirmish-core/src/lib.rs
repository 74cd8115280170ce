//! Tick cycle, state containers, and loop runner for the Skirmish
//! simulation.
//!
//! This crate owns the 4-phase tick cycle that drives the arena:
//! behavior update, physics integration, combat resolution with agent
//! lifecycle, and state synchronization.
//!
//! # Modules
//!
//! - [`clock`] -- tick counter and tick-derived simulation time.
//! - [`config`] -- configuration loading from `skirmish-config.yaml`
//!   into strongly-typed structs.
//! - [`container`] -- versioned [`StateContainer`] values and the shared
//!   dirty ledger.
//! - [`sync`] -- the five-container [`StateStore`] and the
//!   [`Synchronizer`] computing delta updates for transports.
//! - [`physics`] -- the two-pass integrate-then-resolve physics sweep.
//! - [`tick`] -- [`SimulationState`] and its tick cycle.
//! - [`control`] -- shared atomic loop-control state.
//! - [`runner`] -- the async fixed-interval loop driving ticks and
//!   broadcasting updates.
//!
//! [`StateContainer`]: container::StateContainer
//! [`StateStore`]: sync::StateStore
//! [`Synchronizer`]: sync::Synchronizer
//! [`SimulationState`]: tick::SimulationState

pub mod clock;
pub mod config;
pub mod container;
pub mod control;
pub mod physics;
pub mod runner;
pub mod sync;
pub mod tick;

pub use clock::TickClock;
pub use config::SimulationConfig;
pub use control::LoopControl;
pub use runner::{BroadcastSink, GameLoop, NullSink, SharedSimulation};
pub use sync::{StateStore, Synchronizer};
pub use tick::{CommandError, SimulationState, TickError, TickSummary};
