//! Utility helpers: 2D math, the generational arena, logging and profiling.

pub mod allocator;
pub mod logging;
pub mod math;
pub mod profiling;

pub use allocator::{Arena, ArenaHandle, BodyHandle, ConstraintHandle, GenerationalId};
pub use math::*;
pub use profiling::StepProfiler;
