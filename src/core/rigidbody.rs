use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{
    config::{DEFAULT_DENSITY, DEFAULT_GRAVITY_SCALE},
    error::{PhysicsError, Result},
    utils::{
        allocator::BodyHandle,
        math::{cross, cross_scalar},
    },
};

use super::{
    shape::{Shape, TransformedPolygon},
    types::{BodyType, MassProperties, Material, Pose},
};

/// Creation-time parameters for a [`RigidBody`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyParams {
    pub body_type: BodyType,
    /// Only consulted for dynamic bodies.
    pub density: f32,
    pub material: Material,
    pub gravity_scale: f32,
}

impl Default for BodyParams {
    fn default() -> Self {
        Self {
            body_type: BodyType::Dynamic,
            density: DEFAULT_DENSITY,
            material: Material::default(),
            gravity_scale: DEFAULT_GRAVITY_SCALE,
        }
    }
}

impl BodyParams {
    pub fn fixed() -> Self {
        Self {
            body_type: BodyType::Static,
            ..Self::default()
        }
    }
}

/// Rigid body state: pose, velocities, pending forces and derived mass data.
///
/// The shape is shared and immutable. Pose setters keep the world-facing
/// polygon cache in sync, so position and angle are only reachable through
/// accessors.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub(crate) id: BodyHandle,
    shape: Arc<Shape>,
    body_type: BodyType,
    position: Vec2,
    angle: f32,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    pub material: Material,
    pub gravity_scale: f32,
    force: Vec2,
    torque: f32,
    mass: MassProperties,
    previous: Pose,
    world_polygon: Option<TransformedPolygon>,
}

impl RigidBody {
    pub fn new(
        shape: impl Into<Arc<Shape>>,
        position: Vec2,
        angle: f32,
        params: BodyParams,
    ) -> Result<Self> {
        let shape = shape.into();
        let mass = match params.body_type {
            BodyType::Static => MassProperties::infinite(),
            BodyType::Dynamic => {
                if !params.density.is_finite() || params.density <= 0.0 {
                    return Err(PhysicsError::InvalidDensity(params.density));
                }
                let (mass, inertia) = shape.compute_mass(params.density);
                MassProperties::from_mass_inertia(mass, inertia)
            }
        };
        let world_polygon = shape.as_polygon().map(|polygon| polygon.transform(angle));

        Ok(Self {
            id: BodyHandle::default(),
            shape,
            body_type: params.body_type,
            position,
            angle,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            material: params.material,
            gravity_scale: params.gravity_scale,
            force: Vec2::ZERO,
            torque: 0.0,
            mass,
            previous: Pose::new(position, angle),
            world_polygon,
        })
    }

    pub fn builder(shape: impl Into<Arc<Shape>>) -> RigidBodyBuilder {
        RigidBodyBuilder::new(shape)
    }

    /// Advances one step with semi-implicit Euler, then clears pending forces.
    ///
    /// Static bodies keep whatever pose the host assigned.
    pub fn integrate(&mut self, dt: f32, gravity: Vec2) {
        self.previous = self.pose();

        if self.body_type == BodyType::Dynamic {
            let acceleration = self.force * self.mass.inverse_mass + gravity * self.gravity_scale;
            self.linear_velocity += acceleration * dt;
            self.position += self.linear_velocity * dt;
            self.angular_velocity += self.torque * self.mass.inverse_inertia * dt;
            self.angle += self.angular_velocity * dt;
        }

        self.force = Vec2::ZERO;
        self.torque = 0.0;
        self.refresh_world_polygon();
    }

    /// Accumulates a force for the next integration. An offset from the body
    /// center also contributes torque.
    pub fn apply_force(&mut self, force: Vec2, offset: Option<Vec2>) {
        self.force += force;
        if let Some(offset) = offset {
            self.torque += cross(offset, force);
        }
    }

    pub fn apply_torque(&mut self, torque: f32) {
        self.torque += torque;
    }

    /// Immediate velocity change from an impulse applied at `offset` from the center.
    pub fn apply_impulse(&mut self, impulse: Vec2, offset: Vec2) {
        self.linear_velocity += impulse * self.mass.inverse_mass;
        self.angular_velocity += cross(offset, impulse) * self.mass.inverse_inertia;
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
        self.refresh_world_polygon();
    }

    /// Moves the body without producing interpolation between old and new pose.
    pub fn teleport(&mut self, position: Vec2, angle: f32) {
        self.position = position;
        self.angle = angle;
        self.previous = Pose::new(position, angle);
        self.refresh_world_polygon();
    }

    /// Handle assigned by [`crate::PhysicsWorld::add_body`]; null until then.
    pub fn id(&self) -> BodyHandle {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.angle)
    }

    pub fn previous_pose(&self) -> Pose {
        self.previous
    }

    /// Blend of the previous and current step's pose for rendering between steps.
    pub fn interpolated_pose(&self, alpha: f32) -> Pose {
        self.previous.lerp(&self.pose(), alpha)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn shared_shape(&self) -> Arc<Shape> {
        Arc::clone(&self.shape)
    }

    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    pub fn mass_properties(&self) -> &MassProperties {
        &self.mass
    }

    pub fn inverse_mass(&self) -> f32 {
        self.mass.inverse_mass
    }

    pub fn inverse_inertia(&self) -> f32 {
        self.mass.inverse_inertia
    }

    pub fn pending_force(&self) -> Vec2 {
        self.force
    }

    pub fn pending_torque(&self) -> f32 {
        self.torque
    }

    /// Polygon vertices and normals rotated by the current angle, relative to
    /// the position. `None` for circles.
    pub fn world_polygon(&self) -> Option<&TransformedPolygon> {
        self.world_polygon.as_ref()
    }

    /// Velocity of the material point at `offset` from the center.
    pub fn velocity_at(&self, offset: Vec2) -> Vec2 {
        self.linear_velocity + cross_scalar(self.angular_velocity, offset)
    }

    fn refresh_world_polygon(&mut self) {
        if let (Some(cache), Some(polygon)) = (self.world_polygon.as_mut(), self.shape.as_polygon())
        {
            cache.update(polygon, self.angle);
        }
    }
}

/// Fluent construction of a [`RigidBody`] with the documented defaults.
#[derive(Debug, Clone)]
pub struct RigidBodyBuilder {
    shape: Arc<Shape>,
    position: Vec2,
    angle: f32,
    linear_velocity: Vec2,
    angular_velocity: f32,
    params: BodyParams,
}

impl RigidBodyBuilder {
    pub fn new(shape: impl Into<Arc<Shape>>) -> Self {
        Self {
            shape: shape.into(),
            position: Vec2::ZERO,
            angle: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            params: BodyParams::default(),
        }
    }

    pub fn position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn linear_velocity(mut self, velocity: Vec2) -> Self {
        self.linear_velocity = velocity;
        self
    }

    pub fn angular_velocity(mut self, velocity: f32) -> Self {
        self.angular_velocity = velocity;
        self
    }

    pub fn body_type(mut self, body_type: BodyType) -> Self {
        self.params.body_type = body_type;
        self
    }

    pub fn fixed(self) -> Self {
        self.body_type(BodyType::Static)
    }

    pub fn density(mut self, density: f32) -> Self {
        self.params.density = density;
        self
    }

    pub fn material(mut self, material: Material) -> Self {
        self.params.material = material;
        self
    }

    pub fn friction(mut self, friction: f32) -> Self {
        self.params.material.friction = friction;
        self
    }

    pub fn static_friction(mut self, static_friction: f32) -> Self {
        self.params.material.static_friction = static_friction;
        self
    }

    pub fn restitution(mut self, restitution: f32) -> Self {
        self.params.material.restitution = restitution;
        self
    }

    pub fn gravity_scale(mut self, scale: f32) -> Self {
        self.params.gravity_scale = scale;
        self
    }

    pub fn build(self) -> Result<RigidBody> {
        let mut body = RigidBody::new(self.shape, self.position, self.angle, self.params)?;
        if !body.is_static() {
            body.linear_velocity = self.linear_velocity;
            body.angular_velocity = self.angular_velocity;
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> Shape {
        Shape::rectangle(1.0, 1.0).unwrap()
    }

    #[test]
    fn integrate_applies_gravity_then_clears_forces() {
        let mut body = RigidBody::builder(Shape::circle(1.0).unwrap())
            .build()
            .unwrap();
        body.apply_force(Vec2::new(body.mass_properties().mass, 0.0), None);
        body.integrate(0.5, Vec2::new(0.0, -10.0));

        assert_relative_eq!(body.linear_velocity.x, 0.5, epsilon = 1e-5);
        assert_relative_eq!(body.linear_velocity.y, -5.0, epsilon = 1e-5);
        assert_relative_eq!(body.position().y, -2.5, epsilon = 1e-5);
        assert_eq!(body.pending_force(), Vec2::ZERO);
    }

    #[test]
    fn static_bodies_ignore_gravity_and_impulses() {
        let mut body = RigidBody::builder(unit_box())
            .fixed()
            .position(Vec2::new(1.0, 2.0))
            .build()
            .unwrap();
        body.apply_impulse(Vec2::new(100.0, 0.0), Vec2::Y);
        body.integrate(0.1, Vec2::new(0.0, -9.81));

        assert_eq!(body.position(), Vec2::new(1.0, 2.0));
        assert_eq!(body.linear_velocity, Vec2::ZERO);
        assert_eq!(body.angular_velocity, 0.0);
    }

    #[test]
    fn force_at_offset_produces_torque() {
        let mut body = RigidBody::builder(unit_box()).build().unwrap();
        body.apply_force(Vec2::Y, Some(Vec2::X));
        assert_relative_eq!(body.pending_torque(), 1.0);
    }

    #[test]
    fn impulse_at_offset_spins_body() {
        let mut body = RigidBody::builder(unit_box()).build().unwrap();
        let inverse_inertia = body.inverse_inertia();
        body.apply_impulse(Vec2::Y, Vec2::new(0.5, 0.0));
        assert_relative_eq!(body.angular_velocity, 0.5 * inverse_inertia);
        assert_relative_eq!(body.linear_velocity.y, body.inverse_mass());
    }

    #[test]
    fn invalid_density_is_rejected_for_dynamic_bodies() {
        let err = RigidBody::builder(unit_box()).density(0.0).build();
        assert_eq!(err.unwrap_err(), PhysicsError::InvalidDensity(0.0));
        assert!(RigidBody::builder(unit_box())
            .fixed()
            .density(0.0)
            .build()
            .is_ok());
    }

    #[test]
    fn set_angle_refreshes_world_polygon() {
        let mut body = RigidBody::builder(unit_box()).fixed().build().unwrap();
        body.set_angle(std::f32::consts::FRAC_PI_2);
        let cache = body.world_polygon().unwrap();
        assert_relative_eq!(cache.normals[0].x, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn interpolated_pose_blends_previous_and_current() {
        let mut body = RigidBody::builder(Shape::circle(0.5).unwrap())
            .linear_velocity(Vec2::new(2.0, 0.0))
            .build()
            .unwrap();
        body.integrate(0.5, Vec2::ZERO);
        let mid = body.interpolated_pose(0.5);
        assert_relative_eq!(mid.position.x, 0.5, epsilon = 1e-6);
    }
}
