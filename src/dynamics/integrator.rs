use glam::Vec2;

use crate::{core::rigidbody::RigidBody, utils::allocator::Arena};

/// Semi-implicit Euler stepping over every registered body.
#[derive(Debug, Clone, Copy, Default)]
pub struct Integrator;

impl Integrator {
    pub fn new() -> Self {
        Self
    }

    /// Integrates bodies in arena order and returns how many were dynamic.
    pub fn step(&self, bodies: &mut Arena<RigidBody>, dt: f32, gravity: Vec2) -> usize {
        let mut dynamic = 0;
        for (_, body) in bodies.iter_mut() {
            if !body.is_static() {
                dynamic += 1;
            }
            body.integrate(dt, gravity);
        }
        dynamic
    }
}
