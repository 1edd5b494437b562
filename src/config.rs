//! Default constants and world configuration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Default gravity vector applied in the physics world (Y-up).
pub const DEFAULT_GRAVITY: [f32; 2] = [0.0, -9.81];

/// Default fixed integration timestep (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 0.02;

/// Number of solver passes over constraints and contacts per step.
pub const DEFAULT_VELOCITY_ITERATIONS: u32 = 12;

/// Fraction of remaining penetration or joint error corrected per step.
pub const DEFAULT_BIAS_FACTOR: f32 = 0.2;

/// Penetration tolerated before positional bias kicks in.
pub const DEFAULT_SLOP: f32 = 0.01;

/// Default shape density used for mass computation.
pub const DEFAULT_DENSITY: f32 = 1.0;

/// Default kinetic friction coefficient.
pub const DEFAULT_FRICTION: f32 = 0.3;

/// Default static friction coefficient.
pub const DEFAULT_STATIC_FRICTION: f32 = 0.5;

/// Default coefficient of restitution.
pub const DEFAULT_RESTITUTION: f32 = 0.2;

/// Default multiplier applied to world gravity per body.
pub const DEFAULT_GRAVITY_SCALE: f32 = 1.0;

/// Upper bound on accumulated frame time consumed by the fixed-step driver.
pub const MAX_FRAME_LAG: f32 = 0.2;

/// Solver and environment settings for a [`crate::PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub gravity: Vec2,
    pub velocity_iterations: u32,
    pub bias_factor: f32,
    pub slop: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::from_array(DEFAULT_GRAVITY),
            velocity_iterations: DEFAULT_VELOCITY_ITERATIONS,
            bias_factor: DEFAULT_BIAS_FACTOR,
            slop: DEFAULT_SLOP,
        }
    }
}

impl WorldConfig {
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_velocity_iterations(mut self, iterations: u32) -> Self {
        self.velocity_iterations = iterations;
        self
    }

    pub fn with_bias_factor(mut self, bias_factor: f32) -> Self {
        self.bias_factor = bias_factor;
        self
    }

    pub fn with_slop(mut self, slop: f32) -> Self {
        self.slop = slop;
        self
    }

    /// World without gravity, handy for isolated contact and joint setups.
    pub fn zero_gravity() -> Self {
        Self::default().with_gravity(Vec2::ZERO)
    }
}
