//! Layered randomized arena generation.
//!
//! Generation runs in five layers, matching the arena's varied-but-open
//! layout goals:
//!
//! 1. Four large corner walls.
//! 2. An optional center obstacle (50% chance).
//! 3. A parallel-corridor or diagonal formation (random pick).
//! 4. A pass of moderate random walls under a wide minimum gap.
//! 5. A pass of smaller random walls under a tighter gap.
//!
//! Every wall placed after the corners is validated against all existing
//! walls: candidates must be separated along at least one axis by the
//! layer's minimum gap, otherwise the candidate is discarded. This keeps
//! the arena connected enough for agents to move through.

use rand::Rng;
use tracing::debug;

use skirmish_types::Vec2;

use crate::wall::Wall;

/// Minimum gap for the coarse random-wall pass.
const COARSE_GAP: f64 = 50.0;

/// Minimum gap for the fine random-wall pass and fixed formations.
const FINE_GAP: f64 = 30.0;

/// Attempt budget for each random-wall pass.
const MAX_ATTEMPTS: u32 = 100;

/// Generate a full wall layout for an arena of the given extent.
///
/// `num_walls` controls how many walls the two random passes try to add
/// on top of the corner and formation layers.
pub fn generate_walls(width: f64, height: f64, num_walls: usize, rng: &mut impl Rng) -> Vec<Wall> {
    let mut walls = Vec::new();

    generate_corner_walls(&mut walls, width, height, 60.0, 120.0, rng);

    if rng.random_bool(0.5) {
        generate_center_obstacle(&mut walls, width, height, 40.0, 80.0);
    }

    if rng.random_bool(0.5) {
        generate_parallel_walls(&mut walls, width, height, 40.0, 100.0, rng);
    } else {
        generate_diagonal_walls(&mut walls, width, height, 40.0, 100.0, rng);
    }

    let fine_count = num_walls / 2;
    let coarse_count = num_walls.saturating_sub(fine_count);

    add_random_walls(&mut walls, width, height, coarse_count, 40.0, 80.0, COARSE_GAP, rng);
    add_random_walls(&mut walls, width, height, fine_count, 30.0, 60.0, FINE_GAP, rng);

    debug!(wall_count = walls.len(), "Arena walls generated");
    walls
}

/// Place a large wall in each of the four corners.
fn generate_corner_walls(
    walls: &mut Vec<Wall>,
    width: f64,
    height: f64,
    min_size: f64,
    max_size: f64,
    rng: &mut impl Rng,
) {
    let corners = [(0.0, 0.0), (width, 0.0), (0.0, height), (width, height)];

    for (i, (cx, cy)) in corners.into_iter().enumerate() {
        let wall_width = rng.random_range(min_size..max_size);
        let wall_height = rng.random_range(min_size..max_size);

        // Corner anchors on the far edges are pulled inward by the wall extent.
        let x = if cx == width { cx - wall_width } else { cx };
        let y = if cy == height { cy - wall_height } else { cy };

        walls.push(Wall::new(
            format!("Corner-{}", i.saturating_add(1)),
            Vec2::new(x, y),
            wall_width,
            wall_height,
        ));
    }
}

/// Place a single rectangular obstacle in the arena center.
fn generate_center_obstacle(
    walls: &mut Vec<Wall>,
    width: f64,
    height: f64,
    min_size: f64,
    max_size: f64,
) {
    let candidate = Wall::new(
        "Center-1",
        Vec2::new(width / 2.0 - max_size / 2.0, height / 2.0 - min_size / 2.0),
        max_size,
        min_size,
    );
    if is_valid_placement(walls, &candidate, FINE_GAP) {
        walls.push(candidate);
    }
}

/// Place a pair of horizontal walls forming a corridor.
fn generate_parallel_walls(
    walls: &mut Vec<Wall>,
    width: f64,
    height: f64,
    min_size: f64,
    max_size: f64,
    rng: &mut impl Rng,
) {
    let wall_width = rng.random_range(min_size..max_size);
    let wall_height = min_size;
    let gap = rng.random_range(60.0..100.0) + wall_height + FINE_GAP;
    let y_pos = rng.random_range(height * 0.2..height * 0.8);

    for i in 0..2u32 {
        let candidate = Wall::new(
            format!("Parallel-{}", i.saturating_add(1)),
            Vec2::new(width * 0.2, y_pos + gap * f64::from(i)),
            wall_width,
            wall_height,
        );
        if is_valid_placement(walls, &candidate, FINE_GAP) {
            walls.push(candidate);
        }
    }
}

/// Place a pair of angled-footprint walls on opposite sides of the arena.
fn generate_diagonal_walls(
    walls: &mut Vec<Wall>,
    width: f64,
    height: f64,
    min_size: f64,
    max_size: f64,
    rng: &mut impl Rng,
) {
    let wall_length = rng.random_range(min_size..max_size);
    let angle = rng.random_range(30.0_f64..60.0).to_radians();

    // The rectangle takes the bounding box of the rotated segment.
    let wall_width = wall_length * angle.cos();
    let wall_height = wall_length * angle.sin();

    let positions = [(width * 0.2, height * 0.2), (width * 0.8, height * 0.8)];

    for (i, (x, y)) in positions.into_iter().enumerate() {
        let candidate = Wall::new(
            format!("Diagonal-{}", i.saturating_add(1)),
            Vec2::new(x, y),
            wall_width,
            wall_height,
        );
        if is_valid_placement(walls, &candidate, FINE_GAP) {
            walls.push(candidate);
        }
    }
}

/// Try to add `count` random walls, skipping candidates that violate the
/// minimum-gap constraint. Gives up after [`MAX_ATTEMPTS`] tries.
fn add_random_walls(
    walls: &mut Vec<Wall>,
    width: f64,
    height: f64,
    count: usize,
    min_size: f64,
    max_size: f64,
    min_gap: f64,
    rng: &mut impl Rng,
) {
    let mut placed = 0usize;
    let mut attempts = 0u32;

    while placed < count && attempts < MAX_ATTEMPTS {
        attempts = attempts.saturating_add(1);

        let wall_width = rng.random_range(min_size..max_size);
        let wall_height = rng.random_range(min_size..max_size);
        let x = rng.random_range(0.0..width - wall_width);
        let y = rng.random_range(0.0..height - wall_height);

        let candidate = Wall::new(
            format!("Random-{}", walls.len().saturating_add(1)),
            Vec2::new(x, y),
            wall_width,
            wall_height,
        );

        if is_valid_placement(walls, &candidate, min_gap) {
            walls.push(candidate);
            placed = placed.saturating_add(1);
        }
    }

    if placed < count {
        debug!(placed, requested = count, "Random wall pass ran out of attempts");
    }
}

/// Whether `candidate` keeps at least `min_gap` separation from every
/// existing wall along at least one axis.
pub fn is_valid_placement(walls: &[Wall], candidate: &Wall, min_gap: f64) -> bool {
    let cc = candidate.center();
    for wall in walls {
        let wc = wall.center();
        let dx = (cc.x - wc.x).abs();
        let dy = (cc.y - wc.y).abs();

        let x_separation = (candidate.width + wall.width) / 2.0 + min_gap;
        let y_separation = (candidate.height + wall.height) / 2.0 + min_gap;

        if dx < x_separation && dy < y_separation {
            return false;
        }
    }
    true
}
