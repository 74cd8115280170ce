//! Shared type definitions for the Skirmish arena simulation.
//!
//! This crate holds the vocabulary every other crate speaks:
//!
//! - [`ids`] -- strongly-typed UUID wrappers ([`AgentId`], [`ContainerId`]).
//! - [`enums`] -- [`Team`], [`BehaviorKind`], and [`ZoneKind`].
//! - [`vec2`] -- the [`Vec2`] 2-D vector used by physics and steering.
//! - [`snapshot`] -- serialized wire types: agent/world snapshots, team
//!   statistics, kill records, and the outbound message envelope consumed
//!   by the transport layer.
//!
//! Nothing in this crate performs simulation work; it is pure data.

pub mod enums;
pub mod ids;
pub mod snapshot;
pub mod vec2;

pub use enums::{BehaviorKind, Team, ZoneKind};
pub use ids::{AgentId, ContainerId};
pub use snapshot::{
    AgentSnapshot, BehaviorInfo, CombatEvent, DeadAgent, DeltaEntry, FullState, GameUpdate,
    KillRecord, OutboundMessage, TeamCounts, TeamStats, WallSnapshot, WorldSnapshot,
};
pub use vec2::Vec2;
