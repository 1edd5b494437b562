//! 2D helpers layered on top of `glam`.

use glam::{Mat2, Vec2};

/// Below this length a direction is considered degenerate.
pub const DEGENERATE_EPSILON: f32 = 1e-6;

/// Scalar (z-component) cross product of two planar vectors.
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b)
}

/// Cross product of a scalar angular velocity with a lever arm (`w × r`).
#[inline]
pub fn cross_scalar(w: f32, r: Vec2) -> Vec2 {
    Vec2::new(-w * r.y, w * r.x)
}

/// Rotates `v` counter-clockwise by `angle` radians.
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Mat2::from_angle(angle) * v
}

/// Outward normal of the edge `a -> b` for counter-clockwise winding.
#[inline]
pub fn edge_normal(a: Vec2, b: Vec2) -> Vec2 {
    let edge = b - a;
    normalize_or_axis(Vec2::new(edge.y, -edge.x))
}

/// Normalizes `v`, falling back to `Vec2::X` when it has no usable direction.
#[inline]
pub fn normalize_or_axis(v: Vec2) -> Vec2 {
    let length = v.length();
    if length > DEGENERATE_EPSILON && length.is_finite() {
        v / length
    } else {
        Vec2::X
    }
}
