use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_FRICTION, DEFAULT_RESTITUTION, DEFAULT_STATIC_FRICTION};

/// How a body participates in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BodyType {
    /// Infinite mass and inertia; pose is driven by the host, never integrated.
    Static,
    #[default]
    Dynamic,
}

/// Position and orientation of a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec2,
    pub angle: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            angle: 0.0,
        }
    }
}

impl Pose {
    pub fn new(position: Vec2, angle: f32) -> Self {
        Self { position, angle }
    }

    /// Linear blend between two poses; `alpha` is clamped to `[0, 1]`.
    pub fn lerp(&self, other: &Pose, alpha: f32) -> Pose {
        let t = alpha.clamp(0.0, 1.0);
        Pose {
            position: self.position.lerp(other.position, t),
            angle: self.angle + (other.angle - self.angle) * t,
        }
    }
}

/// Mass and rotational inertia together with their inverses.
///
/// Inverses are zero for static bodies, which is how infinite mass is
/// represented everywhere in the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    pub mass: f32,
    pub inertia: f32,
    pub inverse_mass: f32,
    pub inverse_inertia: f32,
}

impl Default for MassProperties {
    fn default() -> Self {
        Self::from_mass_inertia(1.0, 1.0)
    }
}

impl MassProperties {
    pub fn infinite() -> Self {
        Self {
            mass: f32::INFINITY,
            inertia: f32::INFINITY,
            inverse_mass: 0.0,
            inverse_inertia: 0.0,
        }
    }

    pub fn from_mass_inertia(mass: f32, inertia: f32) -> Self {
        Self {
            mass,
            inertia,
            inverse_mass: Self::invert(mass),
            inverse_inertia: Self::invert(inertia),
        }
    }

    fn invert(value: f32) -> f32 {
        if value.is_finite() && value > f32::EPSILON {
            1.0 / value
        } else {
            0.0
        }
    }
}

/// Surface coefficients that affect contact response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Kinetic (sliding) friction coefficient.
    pub friction: f32,
    pub static_friction: f32,
    pub restitution: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            friction: DEFAULT_FRICTION,
            static_friction: DEFAULT_STATIC_FRICTION,
            restitution: DEFAULT_RESTITUTION,
        }
    }
}

impl Material {
    pub fn frictionless(restitution: f32) -> Self {
        Self {
            friction: 0.0,
            static_friction: 0.0,
            restitution,
        }
    }

    pub fn rubber() -> Self {
        Self {
            friction: 1.0,
            static_friction: 1.2,
            restitution: 0.8,
        }
    }

    pub fn ice() -> Self {
        Self {
            friction: 0.03,
            static_friction: 0.05,
            restitution: 0.05,
        }
    }

    pub fn combine_with(&self, other: &Self) -> MaterialPairProperties {
        MaterialPairProperties::from_materials(self, other)
    }
}

/// Coefficients resolved for one contacting pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialPairProperties {
    pub friction: f32,
    pub static_friction: f32,
    pub restitution: f32,
}

impl Default for MaterialPairProperties {
    fn default() -> Self {
        Self::from_materials(&Material::default(), &Material::default())
    }
}

impl MaterialPairProperties {
    /// Frictions are averaged; restitution takes the less bouncy of the two.
    pub fn from_materials(a: &Material, b: &Material) -> Self {
        Self {
            friction: 0.5 * (a.friction + b.friction),
            static_friction: 0.5 * (a.static_friction + b.static_friction),
            restitution: a.restitution.min(b.restitution),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pair_properties_average_friction_and_take_min_restitution() {
        let pair = Material::rubber().combine_with(&Material::ice());
        assert_relative_eq!(pair.friction, 0.515);
        assert_relative_eq!(pair.static_friction, 0.625);
        assert_relative_eq!(pair.restitution, 0.05);
    }

    #[test]
    fn infinite_mass_has_zero_inverses() {
        let props = MassProperties::infinite();
        assert_eq!(props.inverse_mass, 0.0);
        assert_eq!(props.inverse_inertia, 0.0);

        let finite = MassProperties::from_mass_inertia(4.0, 0.5);
        assert_relative_eq!(finite.inverse_mass, 0.25);
        assert_relative_eq!(finite.inverse_inertia, 2.0);
    }

    #[test]
    fn pose_lerp_clamps_alpha() {
        let a = Pose::new(Vec2::ZERO, 0.0);
        let b = Pose::new(Vec2::new(2.0, 0.0), 1.0);
        let mid = a.lerp(&b, 0.5);
        assert_relative_eq!(mid.position.x, 1.0);
        assert_relative_eq!(mid.angle, 0.5);
        assert_eq!(a.lerp(&b, 3.0), b);
    }
}
