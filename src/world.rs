use std::time::Instant;

use glam::Vec2;
use log::{debug, warn};

use crate::{
    collision::{
        broadphase::BroadPhase,
        contact::Manifold,
        narrowphase::NarrowPhase,
        queries::{Ray, Raycast, RaycastHit},
    },
    config::WorldConfig,
    core::{constraints::Constraint, rigidbody::RigidBody},
    dynamics::{
        integrator::Integrator,
        solver::{ConstraintSolver, SolverStepMetrics},
    },
    error::{PhysicsError, Result},
    utils::{
        allocator::{Arena, BodyHandle, ConstraintHandle},
        logging::{warn_if_step_budget_exceeded, ScopedTimer},
        profiling::StepProfiler,
    },
};

/// Owns every body and joint and advances them one step at a time.
///
/// Structural changes (adding or removing bodies and constraints) take
/// `&mut self`, so they can only happen between calls to [`PhysicsWorld::step`].
pub struct PhysicsWorld {
    bodies: Arena<RigidBody, BodyHandle>,
    constraints: Arena<Constraint, ConstraintHandle>,
    config: WorldConfig,
    integrator: Integrator,
    solver: ConstraintSolver,
    broadphase: BroadPhase,
    pairs: Vec<(BodyHandle, BodyHandle)>,
    manifolds: Vec<Manifold>,
    profiler: StepProfiler,
    solver_metrics: SolverStepMetrics,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl PhysicsWorld {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            bodies: Arena::new(),
            constraints: Arena::new(),
            config,
            integrator: Integrator::new(),
            solver: ConstraintSolver::from_config(&config),
            broadphase: BroadPhase::new(),
            pairs: Vec::new(),
            manifolds: Vec::new(),
            profiler: StepProfiler::default(),
            solver_metrics: SolverStepMetrics::default(),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: WorldConfig) {
        self.config = config;
        self.solver = ConstraintSolver::from_config(&config);
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.config.gravity = gravity;
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        let handle = self.bodies.insert(body);
        if let Some(stored) = self.bodies.get_mut(handle) {
            stored.id = handle;
        }
        debug!("added {handle}");
        handle
    }

    /// Removes a body that no constraint references.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<RigidBody> {
        if !self.bodies.contains(handle) {
            return Err(PhysicsError::UnknownBody(handle));
        }
        let referencing = self
            .constraints
            .iter()
            .filter(|(_, constraint)| constraint.involves(handle))
            .count();
        if referencing > 0 {
            return Err(PhysicsError::BodyInUse {
                body: handle,
                constraints: referencing,
            });
        }

        self.manifolds.retain(|manifold| !manifold.involves(handle));
        let body = self
            .bodies
            .remove(handle)
            .ok_or(PhysicsError::UnknownBody(handle))?;
        debug!("removed {handle}");
        Ok(body)
    }

    /// Registers a joint after checking that both bodies are live and distinct.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<ConstraintHandle> {
        for body in [constraint.body_a, constraint.body_b] {
            if !self.bodies.contains(body) {
                return Err(PhysicsError::UnknownBody(body));
            }
        }
        if constraint.body_a == constraint.body_b {
            return Err(PhysicsError::SelfConstraint(constraint.body_a));
        }

        let handle = self.constraints.insert(constraint);
        if let Some(stored) = self.constraints.get_mut(handle) {
            stored.id = handle;
        }
        debug!("added {handle}");
        Ok(handle)
    }

    pub fn remove_constraint(&mut self, handle: ConstraintHandle) -> Result<Constraint> {
        let constraint = self
            .constraints
            .remove(handle)
            .ok_or(PhysicsError::UnknownConstraint(handle))?;
        debug!("removed {handle}");
        Ok(constraint)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    pub fn try_body(&self, handle: BodyHandle) -> Result<&RigidBody> {
        self.bodies
            .get(handle)
            .ok_or(PhysicsError::UnknownBody(handle))
    }

    pub fn try_body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody> {
        self.bodies
            .get_mut(handle)
            .ok_or(PhysicsError::UnknownBody(handle))
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> + '_ {
        self.bodies.iter()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn constraint(&self, handle: ConstraintHandle) -> Option<&Constraint> {
        self.constraints.get(handle)
    }

    pub fn constraints(&self) -> impl Iterator<Item = (ConstraintHandle, &Constraint)> + '_ {
        self.constraints.iter()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn apply_force(
        &mut self,
        handle: BodyHandle,
        force: Vec2,
        offset: Option<Vec2>,
    ) -> Result<()> {
        self.try_body_mut(handle)?.apply_force(force, offset);
        Ok(())
    }

    pub fn apply_torque(&mut self, handle: BodyHandle, torque: f32) -> Result<()> {
        self.try_body_mut(handle)?.apply_torque(torque);
        Ok(())
    }

    pub fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec2, offset: Vec2) -> Result<()> {
        self.try_body_mut(handle)?.apply_impulse(impulse, offset);
        Ok(())
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Integrates every body, detects contacts once, then runs the configured
    /// number of solver iterations over joints followed by contacts.
    pub fn step(&mut self, dt: f32) {
        debug_assert!(
            dt.is_finite() && dt > 0.0,
            "step requires a positive, finite dt (got {dt})"
        );
        if !dt.is_finite() || dt <= 0.0 {
            warn!("skipping physics step with invalid dt {dt}");
            return;
        }

        let step_start = Instant::now();
        let profiler = &mut self.profiler;
        profiler.reset();

        {
            let _timer = ScopedTimer::recording("world::integrate", &mut profiler.integrate_time);
            self.integrator.step(&mut self.bodies, dt, self.config.gravity);
        }
        {
            let _timer =
                ScopedTimer::recording("world::broad_phase", &mut profiler.broad_phase_time);
            self.broadphase.find_pairs_into(&self.bodies, &mut self.pairs);
        }
        {
            let _timer =
                ScopedTimer::recording("world::narrow_phase", &mut profiler.narrow_phase_time);
            self.manifolds.clear();
            for &(a, b) in &self.pairs {
                if let (Some(body_a), Some(body_b)) = (self.bodies.get(a), self.bodies.get(b)) {
                    self.manifolds
                        .extend(NarrowPhase::collide_handled((a, body_a), (b, body_b)));
                }
            }
        }
        {
            let _timer = ScopedTimer::recording("world::solve", &mut profiler.solver_time);
            self.solver_metrics =
                self.solver
                    .solve(&mut self.bodies, &self.constraints, &self.manifolds, dt);
        }

        profiler.total_step_time = step_start.elapsed();
        profiler.body_count = self.bodies.len();
        profiler.constraint_count = self.constraints.len();
        profiler.candidate_pair_count = self.pairs.len();
        profiler.manifold_count = self.manifolds.len();
        profiler.report();
        warn_if_step_budget_exceeded(profiler.total_step_time, dt * 1000.0);
    }

    /// Manifolds found by the most recent step.
    pub fn manifolds(&self) -> &[Manifold] {
        &self.manifolds
    }

    /// Candidate pairs produced by the most recent broad-phase pass.
    pub fn candidate_pairs(&self) -> &[(BodyHandle, BodyHandle)] {
        &self.pairs
    }

    pub fn profiler(&self) -> &StepProfiler {
        &self.profiler
    }

    pub fn solver_metrics(&self) -> &SolverStepMetrics {
        &self.solver_metrics
    }

    /// Bodies whose shape strictly contains `point`.
    pub fn test_point(&self, point: Vec2) -> Vec<BodyHandle> {
        Raycast::point_query(point, &self.bodies)
    }

    /// Nearest body hit by the ray.
    pub fn test_ray(&self, ray: &Ray) -> Option<RaycastHit> {
        Raycast::cast(ray, &self.bodies)
    }

    /// Every body hit by the ray, nearest first.
    pub fn test_ray_all(&self, ray: &Ray) -> Vec<RaycastHit> {
        Raycast::cast_all(ray, &self.bodies)
    }
}
