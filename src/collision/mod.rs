//! Collision detection: bounds, broad-phase, narrow-phase, contact manifolds and queries.

pub mod broadphase;
pub mod clipping;
pub mod contact;
pub mod narrowphase;
pub mod queries;
pub mod shapes;

pub use broadphase::BroadPhase;
pub use contact::Manifold;
pub use narrowphase::{HandledBody, NarrowPhase};
pub use queries::{Ray, Raycast, RaycastHit};
pub use shapes::{Aabb, ShapeUtil};
