//! Overlap tests used by combat resolution and the body integrator
//!
//! All functions here are pure: no entity state is touched, so combat can be
//! reasoned about (and tested) one predicate at a time.

use glam::Vec2;

use super::body::Aabb;

/// Strict box-box overlap (touching edges do not count)
#[inline]
pub fn aabb_overlap(a: &Aabb, b: &Aabb) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

/// Point inside a box grown by `margin` on every side (exclusive bounds)
#[inline]
pub fn point_in_aabb(point: Vec2, aabb: &Aabb, margin: f32) -> bool {
    point.x > aabb.min.x - margin
        && point.x < aabb.max.x + margin
        && point.y > aabb.min.y - margin
        && point.y < aabb.max.y + margin
}

/// Center-distance proximity test (strictly closer than `radius`)
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}
