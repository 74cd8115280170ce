//! Axis-aligned rectangular obstacles.

use serde::{Deserialize, Serialize};
use skirmish_types::snapshot::WallSnapshot;
use skirmish_types::Vec2;

/// A static rectangular obstacle agents cannot pass through.
///
/// `position` is the top-left corner. Walls are immutable after world
/// generation; the [`Arena`](crate::Arena) owns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    /// Human-readable name (e.g. `Corner-1`, `Random-6`).
    pub name: String,
    /// Top-left corner of the wall.
    pub position: Vec2,
    /// Width of the wall.
    pub width: f64,
    /// Height of the wall.
    pub height: f64,
}

impl Wall {
    /// Create a wall from its top-left corner and extent.
    pub fn new(name: impl Into<String>, position: Vec2, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            position,
            width,
            height,
        }
    }

    /// Return the wall edges as `(left, top, right, bottom)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    /// Return the center point of the wall.
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.position.x + self.width / 2.0,
            self.position.y + self.height / 2.0,
        )
    }

    /// Whether the given point lies on or inside the wall rectangle.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        let (left, top, right, bottom) = self.bounds();
        left <= x && x <= right && top <= y && y <= bottom
    }

    /// Project the wall into its wire representation.
    pub fn snapshot(&self) -> WallSnapshot {
        WallSnapshot {
            name: self.name.clone(),
            x: self.position.x,
            y: self.position.y,
            width: self.width,
            height: self.height,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn wall() -> Wall {
        Wall::new("Test", Vec2::new(10.0, 20.0), 40.0, 30.0)
    }

    #[test]
    fn bounds_span_position_plus_extent() {
        assert_eq!(wall().bounds(), (10.0, 20.0, 50.0, 50.0));
    }

    #[test]
    fn contains_point_includes_edges() {
        let w = wall();
        assert!(w.contains_point(10.0, 20.0));
        assert!(w.contains_point(50.0, 50.0));
        assert!(w.contains_point(30.0, 35.0));
        assert!(!w.contains_point(9.9, 35.0));
        assert!(!w.contains_point(30.0, 50.1));
    }

    #[test]
    fn center_is_midpoint() {
        assert_eq!(wall().center(), Vec2::new(30.0, 35.0));
    }

    #[test]
    fn snapshot_carries_geometry() {
        let snap = wall().snapshot();
        assert_eq!(snap.name, "Test");
        assert_eq!(snap.x, 10.0);
        assert_eq!(snap.width, 40.0);
    }
}
