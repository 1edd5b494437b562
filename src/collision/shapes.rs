use glam::Vec2;

use crate::core::{rigidbody::RigidBody, shape::Shape};

/// Axis-aligned bounding box in world (or local) space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn from_points(points: &[Vec2]) -> Self {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for point in points {
            min = min.min(*point);
            max = max.max(*point);
        }
        Self { min, max }
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Inclusive overlap test; touching boxes count as overlapping.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }

    pub fn overlaps_y(&self, other: &Aabb) -> bool {
        !(self.max.y < other.min.y || self.min.y > other.max.y)
    }

    /// Inclusive point containment.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// Exact geometric helpers for shapes attached to bodies.
pub struct ShapeUtil;

impl ShapeUtil {
    /// World bounds from the body's current pose.
    ///
    /// Polygons use the body's cached world-facing vertices, so the box tracks
    /// rotation without re-rotating the local geometry.
    pub fn world_bounds(body: &RigidBody) -> Aabb {
        let local = match body.world_polygon() {
            Some(transformed) => Aabb::from_points(&transformed.vertices),
            None => body.shape().local_bounds(),
        };
        local.translated(body.position())
    }

    /// Strict point-in-shape test against the body's current pose.
    pub fn contains_point(body: &RigidBody, point: Vec2) -> bool {
        let relative = point - body.position();
        match body.shape() {
            Shape::Circle(circle) => relative.length_squared() < circle.radius() * circle.radius(),
            Shape::Polygon(_) => body.world_polygon().is_some_and(|transformed| {
                transformed
                    .vertices
                    .iter()
                    .zip(&transformed.normals)
                    .all(|(vertex, normal)| (relative - *vertex).dot(*normal) < 0.0)
            }),
        }
    }
}
