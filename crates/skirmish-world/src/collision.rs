//! Circle-vs-wall contact queries and collision response.
//!
//! Contacts are computed with the closest-point-on-rectangle test: the
//! nearest point of the wall AABB to the circle center defines the
//! surface normal and penetration depth. Response pushes the body out
//! along the normal, reflects velocity about it scaled by
//! `1 + restitution`, and adds a tangential friction term.

use skirmish_types::Vec2;

use crate::wall::Wall;

/// Default bounce factor applied on wall contact.
pub const DEFAULT_RESTITUTION: f64 = 0.3;

/// Default tangential friction factor applied on wall contact.
pub const DEFAULT_FRICTION: f64 = 0.8;

/// Contact distance below which the normal direction is degenerate
/// (circle center effectively on the wall surface or inside it).
const DEGENERATE_DISTANCE: f64 = 1e-4;

/// A resolved circle-vs-wall contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// How deep the circle penetrates the wall.
    pub penetration: f64,
    /// Unit surface normal pointing from the contact point toward the
    /// circle center.
    pub normal: Vec2,
    /// The contact point on the wall surface.
    pub point: Vec2,
}

/// Test a circle against a wall, returning contact details on overlap.
///
/// When the circle center coincides with the closest wall point (center
/// inside the wall), the normal falls back to the +X axis with full-radius
/// penetration so the caller never divides by zero.
pub fn circle_wall_contact(position: Vec2, radius: f64, wall: &Wall) -> Option<Contact> {
    let (left, top, right, bottom) = wall.bounds();

    let closest = Vec2::new(position.x.clamp(left, right), position.y.clamp(top, bottom));

    let to_circle = position - closest;
    let distance = to_circle.magnitude();

    if distance > radius {
        return None;
    }

    let (normal, penetration) = if distance < DEGENERATE_DISTANCE {
        (Vec2::new(1.0, 0.0), radius)
    } else {
        (to_circle * (1.0 / distance), radius - distance)
    };

    Some(Contact {
        penetration,
        normal,
        point: closest,
    })
}

/// Resolve a contact, returning the corrected `(position, velocity)`.
///
/// `position` and `velocity` must be the pre-integration snapshot of the
/// body, not the already-penetrating state: the correction is applied
/// from the last known-good state so the result is always reachable.
pub fn resolve_contact(
    position: Vec2,
    velocity: Vec2,
    contact: &Contact,
    restitution: f64,
    friction: f64,
) -> (Vec2, Vec2) {
    let new_position = position + contact.normal * contact.penetration;

    // Reflect the normal component of velocity.
    let along_normal = velocity.dot(contact.normal);
    let mut new_velocity = velocity - contact.normal * ((1.0 + restitution) * along_normal);

    // Damped tangential slide along the wall surface.
    let tangent = contact.normal.perp();
    let along_tangent = velocity.dot(tangent);
    new_velocity += tangent * (along_tangent * friction);

    (new_position, new_velocity)
}
