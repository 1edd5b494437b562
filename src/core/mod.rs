//! Core simulation data: shapes, rigid bodies, joints and shared value types.

pub mod constraints;
pub mod rigidbody;
pub mod shape;
pub mod types;

pub use constraints::{Constraint, ConstraintParams};
pub use rigidbody::{BodyParams, RigidBody, RigidBodyBuilder};
pub use shape::{Circle, Polygon, Shape, TransformedPolygon};
pub use types::{BodyType, MassProperties, Material, MaterialPairProperties, Pose};
