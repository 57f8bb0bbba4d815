//! Circle overlap tests between falling entities and the player

use glam::Vec2;

/// Whether two circles overlap.
///
/// Touching circles (distance exactly equal to the radius sum) do not count.
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}
