//! Axis-aligned bounding-box collision

use super::state::Body;

/// Strict AABB overlap test. Entities that merely touch edges do not collide.
pub fn aabb_overlap(a: &Body, b: &Body) -> bool {
    a.pos.x < b.pos.x + b.size.x
        && a.pos.x + a.size.x > b.pos.x
        && a.pos.y < b.pos.y + b.size.y
        && a.pos.y + a.size.y > b.pos.y
}
