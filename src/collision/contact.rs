use glam::Vec2;

use crate::{core::types::MaterialPairProperties, utils::allocator::BodyHandle};

/// Contact data for one overlapping pair, rebuilt every step.
///
/// `normal` points from `body_a` to `body_b`. Contact points are stored
/// relative to `body_b`'s position and lie on its surface, at the deepest
/// point inside `body_a`.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifold {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub normal: Vec2,
    pub penetration: f32,
    pub material: MaterialPairProperties,
    points: [Vec2; 2],
    point_count: usize,
    origin_b: Vec2,
}

impl Manifold {
    /// Builds a manifold from one or two contact points relative to `body_b`.
    ///
    /// Extra points beyond two are ignored; a negative penetration is clamped to zero.
    pub fn new(
        body_a: BodyHandle,
        body_b: BodyHandle,
        normal: Vec2,
        penetration: f32,
        contacts: &[Vec2],
        origin_b: Vec2,
        material: MaterialPairProperties,
    ) -> Self {
        let mut points = [Vec2::ZERO; 2];
        let point_count = contacts.len().min(2);
        points[..point_count].copy_from_slice(&contacts[..point_count]);
        Self {
            body_a,
            body_b,
            normal,
            penetration: penetration.max(0.0),
            material,
            points,
            point_count,
            origin_b,
        }
    }

    /// Contact points relative to `body_b`.
    pub fn contacts(&self) -> &[Vec2] {
        &self.points[..self.point_count]
    }

    /// Contact points in world space, for debug drawing.
    pub fn world_contacts(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.contacts().iter().map(move |p| self.origin_b + *p)
    }

    pub fn involves(&self, body: BodyHandle) -> bool {
        self.body_a == body || self.body_b == body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_contacts_offset_by_body_b_position() {
        let manifold = Manifold::new(
            BodyHandle::default(),
            BodyHandle::default(),
            Vec2::X,
            -0.1,
            &[Vec2::new(-1.0, 0.0)],
            Vec2::new(5.0, 2.0),
            MaterialPairProperties::default(),
        );
        assert_eq!(manifold.penetration, 0.0);
        assert_eq!(manifold.contacts().len(), 1);
        let world: Vec<Vec2> = manifold.world_contacts().collect();
        assert_eq!(world, vec![Vec2::new(4.0, 2.0)]);
    }
}
