use glam::Vec2;

use crate::{
    core::{rigidbody::RigidBody, types::MaterialPairProperties},
    utils::math::cross,
};

/// Coulomb friction impulse for one contact point, applied after the normal impulse.
///
/// The impulse that would stop tangential sliding is kept while it stays inside
/// the static cone `|jt| <= static_friction * jn`. Otherwise the contact slides
/// and the impulse drops to `friction * jn`. Returns the applied magnitude.
pub fn apply_friction(
    body_a: &mut RigidBody,
    body_b: &mut RigidBody,
    normal: Vec2,
    r_a: Vec2,
    r_b: Vec2,
    normal_impulse: f32,
    material: &MaterialPairProperties,
) -> f32 {
    if normal_impulse <= 0.0 {
        return 0.0;
    }

    let tangent = normal.perp();
    let relative_velocity = body_b.velocity_at(r_b) - body_a.velocity_at(r_a);

    let rt_a = cross(r_a, tangent);
    let rt_b = cross(r_b, tangent);
    let inverse_mass_sum = body_a.inverse_mass()
        + body_b.inverse_mass()
        + rt_a * rt_a * body_a.inverse_inertia()
        + rt_b * rt_b * body_b.inverse_inertia();
    if inverse_mass_sum <= f32::EPSILON {
        return 0.0;
    }

    let mut tangent_impulse = -relative_velocity.dot(tangent) / inverse_mass_sum;
    if tangent_impulse.abs() > normal_impulse * material.static_friction {
        tangent_impulse = tangent_impulse.signum() * normal_impulse * material.friction;
    }

    let impulse = tangent * tangent_impulse;
    body_a.apply_impulse(-impulse, r_a);
    body_b.apply_impulse(impulse, r_b);
    tangent_impulse.abs()
}
