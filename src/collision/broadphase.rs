use crate::{
    core::rigidbody::RigidBody,
    utils::allocator::{Arena, BodyHandle},
};

use super::shapes::{Aabb, ShapeUtil};

#[derive(Debug, Clone, Copy)]
struct SweepEntry {
    body: BodyHandle,
    bounds: Aabb,
    is_static: bool,
}

/// Sort-and-sweep candidate pair generation along the x axis.
///
/// Bodies are visited in arena slot order and sorted stably by their AABB's
/// minimum x, so equal inputs always yield the same pair list in the same
/// order.
#[derive(Debug, Default)]
pub struct BroadPhase {
    entries: Vec<SweepEntry>,
}

impl BroadPhase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs whose world AABBs overlap. Static-static pairs are never emitted.
    pub fn find_pairs(&mut self, bodies: &Arena<RigidBody>) -> Vec<(BodyHandle, BodyHandle)> {
        let mut pairs = Vec::new();
        self.find_pairs_into(bodies, &mut pairs);
        pairs
    }

    pub fn find_pairs_into(
        &mut self,
        bodies: &Arena<RigidBody>,
        pairs: &mut Vec<(BodyHandle, BodyHandle)>,
    ) {
        pairs.clear();
        self.entries.clear();
        self.entries.extend(bodies.iter().map(|(handle, body)| SweepEntry {
            body: handle,
            bounds: ShapeUtil::world_bounds(body),
            is_static: body.is_static(),
        }));
        self.entries.sort_by(|a, b| a.bounds.min.x.total_cmp(&b.bounds.min.x));

        for (i, current) in self.entries.iter().enumerate() {
            for candidate in &self.entries[i + 1..] {
                if candidate.bounds.min.x > current.bounds.max.x {
                    break;
                }
                if current.is_static && candidate.is_static {
                    continue;
                }
                if current.bounds.overlaps_y(&candidate.bounds) {
                    pairs.push((current.body, candidate.body));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shape::Shape;
    use glam::Vec2;

    fn add(bodies: &mut Arena<RigidBody>, position: Vec2, fixed: bool) -> BodyHandle {
        let mut builder = RigidBody::builder(Shape::circle(1.0).unwrap()).position(position);
        if fixed {
            builder = builder.fixed();
        }
        bodies.insert(builder.build().unwrap())
    }

    #[test]
    fn overlapping_bodies_are_paired_in_sweep_order() {
        let mut bodies = Arena::new();
        let right = add(&mut bodies, Vec2::new(1.5, 0.0), false);
        let left = add(&mut bodies, Vec2::ZERO, false);
        add(&mut bodies, Vec2::new(10.0, 0.0), false);

        let pairs = BroadPhase::new().find_pairs(&bodies);
        assert_eq!(pairs, vec![(left, right)]);
    }

    #[test]
    fn vertical_separation_filters_pairs() {
        let mut bodies = Arena::new();
        add(&mut bodies, Vec2::ZERO, false);
        add(&mut bodies, Vec2::new(0.5, 5.0), false);
        assert!(BroadPhase::new().find_pairs(&bodies).is_empty());
    }

    #[test]
    fn static_pairs_are_skipped() {
        let mut bodies = Arena::new();
        let a = add(&mut bodies, Vec2::ZERO, true);
        add(&mut bodies, Vec2::new(0.5, 0.0), true);
        let dynamic = add(&mut bodies, Vec2::new(1.0, 0.0), false);

        let pairs = BroadPhase::new().find_pairs(&bodies);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|(x, y)| *x == dynamic || *y == dynamic));
        assert!(pairs.contains(&(a, dynamic)));
    }
}
