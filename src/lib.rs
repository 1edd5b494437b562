//! Lumin Physics – 2D rigid-body simulation core.
//!
//! Bodies with circle or convex polygon shapes are integrated with
//! semi-implicit Euler, collided with a sweep-and-prune broad phase and exact
//! narrow-phase tests, and resolved with a sequential impulse solver that also
//! drives distance joints. The crate renders nothing and owns no clock;
//! the host feeds time in through [`PhysicsWorld::step`] or the fixed-step
//! [`PhysicsEngine`].

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod utils;
pub mod world;

pub use glam::Vec2;

pub use collision::{
    broadphase::BroadPhase,
    contact::Manifold,
    queries::{Ray, RaycastHit},
    shapes::Aabb,
};
pub use config::WorldConfig;
pub use crate::core::{
    constraints::{Constraint, ConstraintParams},
    rigidbody::{BodyParams, RigidBody, RigidBodyBuilder},
    shape::{Circle, Polygon, Shape},
    types::{BodyType, Material, Pose},
};
pub use error::{PhysicsError, Result};
pub use utils::allocator::{BodyHandle, ConstraintHandle};
pub use world::PhysicsWorld;

use config::{DEFAULT_TIME_STEP, MAX_FRAME_LAG};
use utils::logging::ScopedTimer;

/// Fixed-timestep driver that owns a [`PhysicsWorld`].
///
/// Frame time is accumulated and consumed in whole steps; the remainder is
/// returned as an interpolation factor for rendering between steps.
pub struct PhysicsEngine {
    world: PhysicsWorld,
    time_step: f32,
    accumulator: f32,
}

impl Default for PhysicsEngine {
    fn default() -> Self {
        Self::new(WorldConfig::default(), DEFAULT_TIME_STEP)
    }
}

impl PhysicsEngine {
    /// Creates an engine with the given fixed step; non-positive steps fall back to the default.
    pub fn new(config: WorldConfig, time_step: f32) -> Self {
        let time_step = if time_step.is_finite() && time_step > 0.0 {
            time_step
        } else {
            DEFAULT_TIME_STEP
        };
        Self {
            world: PhysicsWorld::new(config),
            time_step,
            accumulator: 0.0,
        }
    }

    pub fn time_step(&self) -> f32 {
        self.time_step
    }

    /// Runs as many fixed steps as the accumulated frame time allows and
    /// returns the interpolation alpha in `[0, 1)`.
    ///
    /// Accumulated lag is clamped so a long stall does not trigger an
    /// unbounded catch-up loop.
    pub fn advance(&mut self, frame_dt: f32) -> f32 {
        let _timer = ScopedTimer::new("engine::advance");
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }
        if self.accumulator > MAX_FRAME_LAG {
            log::warn!(
                "physics fell behind by {:.3} s; dropping lag beyond {MAX_FRAME_LAG} s",
                self.accumulator
            );
            self.accumulator = MAX_FRAME_LAG;
        }

        while self.accumulator >= self.time_step {
            self.world.step(self.time_step);
            self.accumulator -= self.time_step;
        }

        self.accumulator / self.time_step
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        self.world.add_body(body)
    }

    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<ConstraintHandle> {
        self.world.add_constraint(constraint)
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }
}
