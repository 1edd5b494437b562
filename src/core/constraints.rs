use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{
    error::{PhysicsError, Result},
    utils::{
        allocator::{BodyHandle, ConstraintHandle},
        math::{cross, cross_scalar, normalize_or_axis, rotate, DEGENERATE_EPSILON},
    },
};

use super::rigidbody::RigidBody;

/// Anchor offsets and softness of a distance joint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintParams {
    /// Anchor on body A in its local frame.
    pub point_a: Vec2,
    /// Anchor on body B in its local frame.
    pub point_b: Vec2,
    /// Scales the positional bias; 1 corrects at the full bias rate.
    pub stiffness: f32,
    /// Scales the relative anchor velocity term.
    pub damping: f32,
}

impl Default for ConstraintParams {
    fn default() -> Self {
        Self {
            point_a: Vec2::ZERO,
            point_b: Vec2::ZERO,
            stiffness: 1.0,
            damping: 1.0,
        }
    }
}

impl ConstraintParams {
    pub fn with_anchors(mut self, point_a: Vec2, point_b: Vec2) -> Self {
        self.point_a = point_a;
        self.point_b = point_b;
        self
    }

    pub fn with_stiffness(mut self, stiffness: f32) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }
}

/// Distance joint holding two anchors `length` apart.
///
/// A zero length welds the anchors together: the joint is then solved along
/// both world axes instead of along the (undefined) anchor direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Assigned by [`crate::PhysicsWorld::add_constraint`].
    pub id: ConstraintHandle,
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    length: f32,
    pub params: ConstraintParams,
}

impl Constraint {
    pub fn new(
        body_a: BodyHandle,
        body_b: BodyHandle,
        length: f32,
        params: ConstraintParams,
    ) -> Result<Self> {
        if !length.is_finite() || length < 0.0 {
            return Err(PhysicsError::InvalidLength(length));
        }
        Ok(Self {
            id: ConstraintHandle::default(),
            body_a,
            body_b,
            length,
            params,
        })
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn is_weld(&self) -> bool {
        self.length <= DEGENERATE_EPSILON
    }

    pub fn involves(&self, body: BodyHandle) -> bool {
        self.body_a == body || self.body_b == body
    }

    /// World-space anchor positions for the bodies' current poses.
    pub fn world_anchors(&self, body_a: &RigidBody, body_b: &RigidBody) -> (Vec2, Vec2) {
        (
            body_a.position() + rotate(self.params.point_a, body_a.angle()),
            body_b.position() + rotate(self.params.point_b, body_b.angle()),
        )
    }

    /// Distance between the anchors minus the rest length.
    pub fn error(&self, body_a: &RigidBody, body_b: &RigidBody) -> f32 {
        let (anchor_a, anchor_b) = self.world_anchors(body_a, body_b);
        anchor_a.distance(anchor_b) - self.length
    }

    /// One velocity-level pass over the joint.
    pub fn solve(&self, body_a: &mut RigidBody, body_b: &mut RigidBody, bias_rate: f32) {
        let r_a = rotate(self.params.point_a, body_a.angle());
        let r_b = rotate(self.params.point_b, body_b.angle());
        let delta = (body_a.position() + r_a) - (body_b.position() + r_b);

        if self.is_weld() {
            self.solve_axis(body_a, body_b, r_a, r_b, Vec2::X, delta.x, bias_rate);
            self.solve_axis(body_a, body_b, r_a, r_b, Vec2::Y, delta.y, bias_rate);
        } else {
            let direction = normalize_or_axis(delta);
            let error = delta.length() - self.length;
            self.solve_axis(body_a, body_b, r_a, r_b, direction, error, bias_rate);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn solve_axis(
        &self,
        body_a: &mut RigidBody,
        body_b: &mut RigidBody,
        r_a: Vec2,
        r_b: Vec2,
        axis: Vec2,
        error: f32,
        bias_rate: f32,
    ) {
        let rn_a = cross(r_a, axis);
        let rn_b = cross(r_b, axis);
        let k = body_a.inverse_mass()
            + body_b.inverse_mass()
            + rn_a * rn_a * body_a.inverse_inertia()
            + rn_b * rn_b * body_b.inverse_inertia();
        if k <= DEGENERATE_EPSILON {
            return;
        }

        let v_a = body_a.linear_velocity + cross_scalar(body_a.angular_velocity, r_a);
        let v_b = body_b.linear_velocity + cross_scalar(body_b.angular_velocity, r_b);
        let error_rate = axis.dot(v_a - v_b);

        let lambda =
            -(self.params.damping * error_rate + self.params.stiffness * bias_rate * error) / k;
        let impulse = axis * lambda;
        body_a.apply_impulse(impulse, r_a);
        body_b.apply_impulse(-impulse, r_b);
    }
}
