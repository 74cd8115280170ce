//! The [`Arena`]: bounds plus the static wall set, with contact queries
//! and spawn-position sampling.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use skirmish_types::snapshot::WorldSnapshot;
use skirmish_types::Vec2;

use crate::collision::{circle_wall_contact, Contact};
use crate::error::WorldError;
use crate::generate;
use crate::wall::Wall;

/// Default arena bounds `(min_x, min_y, max_x, max_y)`.
pub const DEFAULT_BOUNDS: [f64; 4] = [0.0, 0.0, 800.0, 600.0];

/// Margin kept between sampled spawn positions and the arena edge.
const SPAWN_MARGIN: f64 = 20.0;

/// Attempt budget for free-position rejection sampling.
const SPAWN_ATTEMPTS: u32 = 100;

/// The static world: rectangular bounds and the walls inside them.
///
/// Immutable during a tick; regenerated only by the reset command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    /// Arena bounds as `[min_x, min_y, max_x, max_y]`.
    bounds: [f64; 4],
    /// All walls in the arena.
    walls: Vec<Wall>,
}

impl Arena {
    /// Create an empty arena with the given bounds.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidBounds`] if either extent is
    /// non-positive.
    pub fn new(bounds: [f64; 4]) -> Result<Self, WorldError> {
        let [min_x, min_y, max_x, max_y] = bounds;
        if max_x <= min_x || max_y <= min_y {
            return Err(WorldError::InvalidBounds {
                reason: format!("bounds [{min_x}, {min_y}, {max_x}, {max_y}] have non-positive extent"),
            });
        }
        Ok(Self {
            bounds,
            walls: Vec::new(),
        })
    }

    /// Create an arena with a freshly generated wall layout.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidBounds`] if either extent is
    /// non-positive.
    pub fn generate(
        bounds: [f64; 4],
        num_walls: usize,
        rng: &mut impl Rng,
    ) -> Result<Self, WorldError> {
        let mut arena = Self::new(bounds)?;
        arena.regenerate(num_walls, rng);
        Ok(arena)
    }

    /// Discard all walls and generate a new layout.
    pub fn regenerate(&mut self, num_walls: usize, rng: &mut impl Rng) {
        let [min_x, min_y, max_x, max_y] = self.bounds;
        self.walls = generate::generate_walls(max_x - min_x, max_y - min_y, num_walls, rng);
        debug!(wall_count = self.walls.len(), "Arena regenerated");
    }

    /// Return the arena bounds as `[min_x, min_y, max_x, max_y]`.
    pub const fn bounds(&self) -> [f64; 4] {
        self.bounds
    }

    /// Return the arena center point.
    pub fn center(&self) -> Vec2 {
        let [min_x, min_y, max_x, max_y] = self.bounds;
        Vec2::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0)
    }

    /// Return all walls.
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Add a wall to the arena.
    pub fn add_wall(&mut self, wall: Wall) {
        self.walls.push(wall);
    }

    /// Remove every wall.
    pub fn clear_walls(&mut self) {
        self.walls.clear();
    }

    /// Find the closest wall contact for a circle, if any wall overlaps it.
    ///
    /// When several walls collide with the circle, the one whose contact
    /// point lies nearest the circle center wins; only that contact is
    /// resolved.
    pub fn closest_contact(&self, position: Vec2, radius: f64) -> Option<Contact> {
        let mut closest: Option<Contact> = None;
        let mut min_distance = f64::INFINITY;

        for wall in &self.walls {
            if let Some(contact) = circle_wall_contact(position, radius, wall) {
                let distance = contact.point.distance(position);
                if distance < min_distance {
                    min_distance = distance;
                    closest = Some(contact);
                }
            }
        }

        closest
    }

    /// Whether the given point lies inside any wall.
    pub fn point_hits_wall(&self, x: f64, y: f64) -> bool {
        self.walls.iter().any(|wall| wall.contains_point(x, y))
    }

    /// Sample a random position clear of all walls.
    ///
    /// Rejection-samples up to 100 candidates inside the bounds (with a
    /// small edge margin); falls back to the arena center when every
    /// attempt lands in a wall.
    pub fn random_free_position(&self, rng: &mut impl Rng) -> Vec2 {
        let [min_x, min_y, max_x, max_y] = self.bounds;

        for _ in 0..SPAWN_ATTEMPTS {
            let candidate = Vec2::new(
                rng.random_range(min_x + SPAWN_MARGIN..max_x - SPAWN_MARGIN),
                rng.random_range(min_y + SPAWN_MARGIN..max_y - SPAWN_MARGIN),
            );
            if !self.point_hits_wall(candidate.x, candidate.y) {
                return candidate;
            }
        }

        warn!("No free spawn position found, falling back to arena center");
        self.center()
    }

    /// Project the arena into its wire representation.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            walls: self.walls.iter().map(Wall::snapshot).collect(),
            bounds: self.bounds,
            holes: Vec::new(),
            colines: Vec::new(),
        }
    }
}
