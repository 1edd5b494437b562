use crate::{
    collision::contact::Manifold,
    config::WorldConfig,
    core::{constraints::Constraint, rigidbody::RigidBody},
    utils::{
        allocator::{Arena, ConstraintHandle},
        math::cross,
    },
};

use super::friction::apply_friction;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SolverStepMetrics {
    pub contacts_solved: usize,
    pub joints_solved: usize,
    pub normal_impulse_sum: f32,
    pub tangent_impulse_sum: f32,
}

/// Sequential impulse solver with Baumgarte bias folded into the velocity pass.
///
/// Each iteration resolves every joint, then every contact point, in
/// collection order. Nothing is carried between steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintSolver {
    pub iterations: u32,
    pub bias_factor: f32,
    pub slop: f32,
}

impl Default for ConstraintSolver {
    fn default() -> Self {
        Self::from_config(&WorldConfig::default())
    }
}

impl ConstraintSolver {
    pub fn from_config(config: &WorldConfig) -> Self {
        Self {
            iterations: config.velocity_iterations,
            bias_factor: config.bias_factor,
            slop: config.slop,
        }
    }

    pub fn solve(
        &self,
        bodies: &mut Arena<RigidBody>,
        constraints: &Arena<Constraint, ConstraintHandle>,
        manifolds: &[Manifold],
        dt: f32,
    ) -> SolverStepMetrics {
        let mut metrics = SolverStepMetrics::default();
        let bias_rate = self.bias_factor / dt;

        for _ in 0..self.iterations {
            for (_, constraint) in constraints.iter() {
                if let Some((body_a, body_b)) =
                    bodies.get2_mut(constraint.body_a, constraint.body_b)
                {
                    constraint.solve(body_a, body_b, bias_rate);
                    metrics.joints_solved += 1;
                }
            }

            for manifold in manifolds {
                if let Some((body_a, body_b)) = bodies.get2_mut(manifold.body_a, manifold.body_b) {
                    self.resolve_manifold(body_a, body_b, manifold, bias_rate, &mut metrics);
                }
            }
        }

        metrics
    }

    /// One pass over a manifold's contact points, each solved independently.
    pub fn resolve_manifold(
        &self,
        body_a: &mut RigidBody,
        body_b: &mut RigidBody,
        manifold: &Manifold,
        bias_rate: f32,
        metrics: &mut SolverStepMetrics,
    ) {
        let inverse_mass_a = body_a.inverse_mass();
        let inverse_mass_b = body_b.inverse_mass();
        let total_inverse_mass = inverse_mass_a + inverse_mass_b;
        if total_inverse_mass <= 0.0 {
            return;
        }

        let normal = manifold.normal;
        let penetration = manifold.penetration;
        let center_offset = body_b.position() - body_a.position();

        for contact in manifold.contacts() {
            // Split the overlap between both surfaces by inverse mass.
            let surface_a = *contact + normal * penetration;
            let r_b = *contact * (inverse_mass_b / total_inverse_mass)
                + surface_a * (inverse_mass_a / total_inverse_mass);
            let r_a = r_b + center_offset;

            let rn_a = cross(r_a, normal);
            let rn_b = cross(r_b, normal);
            let inverse_effective_mass = total_inverse_mass
                + rn_a * rn_a * body_a.inverse_inertia()
                + rn_b * rn_b * body_b.inverse_inertia();
            let effective_mass = 1.0 / inverse_effective_mass;

            let relative_velocity = body_b.velocity_at(r_b) - body_a.velocity_at(r_a);
            let bias = bias_rate * (penetration - self.slop).max(0.0);

            let normal_impulse = ((1.0 + manifold.material.restitution)
                * (-relative_velocity.dot(normal) + bias)
                * effective_mass)
                .max(0.0);

            let impulse = normal * normal_impulse;
            body_a.apply_impulse(-impulse, r_a);
            body_b.apply_impulse(impulse, r_b);

            let tangent_impulse = apply_friction(
                body_a,
                body_b,
                normal,
                r_a,
                r_b,
                normal_impulse,
                &manifold.material,
            );

            metrics.contacts_solved += 1;
            metrics.normal_impulse_sum += normal_impulse;
            metrics.tangent_impulse_sum += tangent_impulse;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collision::narrowphase::NarrowPhase,
        core::{shape::Shape, types::Material},
    };
    use approx::assert_relative_eq;
    use glam::Vec2;

    fn ball(bodies: &mut Arena<RigidBody>, x: f32, velocity: f32, restitution: f32) {
        let handle = bodies.insert(
            RigidBody::builder(Shape::circle(1.0).unwrap())
                .position(Vec2::new(x, 0.0))
                .linear_velocity(Vec2::new(velocity, 0.0))
                .material(Material::frictionless(restitution))
                .build()
                .unwrap(),
        );
        if let Some(body) = bodies.get_mut(handle) {
            body.id = handle;
        }
    }

    fn collide_all(bodies: &Arena<RigidBody>) -> Vec<Manifold> {
        let all: Vec<&RigidBody> = bodies.iter().map(|(_, body)| body).collect();
        NarrowPhase::collide(all[0], all[1]).into_iter().collect()
    }

    #[test]
    fn elastic_head_on_collision_exchanges_velocity() {
        let mut bodies = Arena::new();
        ball(&mut bodies, 0.0, 1.0, 1.0);
        ball(&mut bodies, 1.995, 0.0, 1.0);
        let manifolds = collide_all(&bodies);
        assert_eq!(manifolds.len(), 1);

        let solver = ConstraintSolver::default();
        let metrics = solver.solve(&mut bodies, &Arena::new(), &manifolds, 1.0 / 60.0);

        let velocities: Vec<f32> = bodies.iter().map(|(_, b)| b.linear_velocity.x).collect();
        assert_relative_eq!(velocities[0], 0.0, epsilon = 1e-5);
        assert_relative_eq!(velocities[1], 1.0, epsilon = 1e-5);
        assert_eq!(metrics.contacts_solved, solver.iterations as usize);
    }

    #[test]
    fn inelastic_collision_leaves_common_velocity() {
        let mut bodies = Arena::new();
        ball(&mut bodies, 0.0, 1.0, 0.0);
        ball(&mut bodies, 1.995, 0.0, 0.0);
        let manifolds = collide_all(&bodies);

        ConstraintSolver::default().solve(&mut bodies, &Arena::new(), &manifolds, 1.0 / 60.0);

        for (_, body) in bodies.iter() {
            assert_relative_eq!(body.linear_velocity.x, 0.5, epsilon = 1e-5);
        }
    }

    #[test]
    fn deep_overlap_pushes_bodies_apart() {
        let mut bodies = Arena::new();
        ball(&mut bodies, 0.0, 0.0, 0.0);
        ball(&mut bodies, 1.5, 0.0, 0.0);
        let manifolds = collide_all(&bodies);

        ConstraintSolver::default().solve(&mut bodies, &Arena::new(), &manifolds, 1.0 / 60.0);

        let velocities: Vec<f32> = bodies.iter().map(|(_, b)| b.linear_velocity.x).collect();
        assert!(velocities[0] < 0.0);
        assert!(velocities[1] > 0.0);
        assert_relative_eq!(velocities[0], -velocities[1], epsilon = 1e-5);
    }
}
