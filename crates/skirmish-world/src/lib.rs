//! Arena geometry, walls, and collision response for the Skirmish simulation.
//!
//! # Modules
//!
//! - [`wall`] -- axis-aligned rectangular obstacles.
//! - [`collision`] -- circle-vs-wall contact queries and the
//!   restitution/friction collision response.
//! - [`generate`] -- layered randomized arena generation.
//! - [`arena`] -- the [`Arena`] container owning bounds and walls, with
//!   closest-contact queries and free-position sampling.
//!
//! The arena is static once generated: agents collide against it, but
//! nothing in this crate mutates during a tick.

pub mod arena;
pub mod collision;
pub mod error;
pub mod generate;
pub mod wall;

pub use arena::Arena;
pub use collision::{Contact, DEFAULT_FRICTION, DEFAULT_RESTITUTION};
pub use error::WorldError;
pub use wall::Wall;
