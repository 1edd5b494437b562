//! Simulation dynamics: integration, the contact and joint solver, and friction.

pub mod friction;
pub mod integrator;
pub mod solver;

pub use friction::apply_friction;
pub use integrator::Integrator;
pub use solver::{ConstraintSolver, SolverStepMetrics};
