//! Error types for the physics core.
//!
//! Construction errors reject invalid geometry and parameters up front;
//! referential errors report handles that do not name a live world entry.
//! Numerical degeneracies never surface here, they are resolved in place.

use thiserror::Error;

use crate::utils::allocator::{BodyHandle, ConstraintHandle};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Circle radius was zero, negative or not finite.
    #[error("circle radius must be finite and positive, got {0}")]
    InvalidRadius(f32),
    /// Polygon has fewer than three vertices.
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    /// A polygon vertex contains NaN or infinity.
    #[error("polygon vertex {0} is not finite")]
    NonFiniteVertex(usize),
    /// Two consecutive polygon vertices coincide.
    #[error("polygon edge starting at vertex {0} has zero length")]
    DegenerateEdge(usize),
    /// Polygon is concave or wound clockwise.
    #[error("polygon is concave or not counter-clockwise at vertex {0}")]
    ConcavePolygon(usize),
    /// Polygon encloses no area.
    #[error("polygon encloses zero area")]
    ZeroArea,
    /// Density must be finite and positive for dynamic bodies.
    #[error("density must be finite and positive, got {0}")]
    InvalidDensity(f32),
    /// Constraint rest length must be finite and non-negative.
    #[error("constraint length must be finite and non-negative, got {0}")]
    InvalidLength(f32),
    /// Ray direction has no usable length.
    #[error("ray direction must be non-zero and finite")]
    DegenerateRay,
    /// Handle does not refer to a body registered in the world.
    #[error("{0} is not registered in this world")]
    UnknownBody(BodyHandle),
    /// Handle does not refer to a constraint registered in the world.
    #[error("{0} is not registered in this world")]
    UnknownConstraint(ConstraintHandle),
    /// Constraint endpoints name the same body.
    #[error("constraint cannot attach {0} to itself")]
    SelfConstraint(BodyHandle),
    /// Body is still referenced by constraints and cannot be removed.
    #[error("{body} is still referenced by {constraints} constraint(s)")]
    BodyInUse {
        body: BodyHandle,
        constraints: usize,
    },
}

/// Convenient Result alias for physics operations.
pub type Result<T> = std::result::Result<T, PhysicsError>;
