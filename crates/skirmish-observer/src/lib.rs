//! Observer API server (Axum HTTP + `WebSocket`) for the Skirmish
//! simulation.
//!
//! The observer is the transport seam around the core: it broadcasts the
//! loop's per-tick messages to every connected `WebSocket` client,
//! accepts the inbound command surface (toggle, spawn, behavior
//! overrides, configuration, reset) on the same socket, and serves REST
//! snapshots of the simulation state.
//!
//! # Modules
//!
//! - [`state`] -- shared [`AppState`]: simulation handle, loop control,
//!   and the broadcast channel.
//! - [`commands`] -- the inbound command surface.
//! - [`ws`] -- the bidirectional `WebSocket` handler.
//! - [`handlers`] -- REST endpoint handlers.
//! - [`router`] -- route table and middleware assembly.
//! - [`server`] -- TCP bind and serve lifecycle.
//! - [`error`] -- [`ObserverError`] with its HTTP mapping.
//!
//! [`AppState`]: state::AppState
//! [`ObserverError`]: error::ObserverError

pub mod commands;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

pub use error::ObserverError;
pub use router::build_router;
pub use server::{spawn_server, ServerConfig};
pub use state::AppState;
