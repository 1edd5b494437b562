use glam::Vec2;

use crate::{
    core::{
        rigidbody::RigidBody,
        shape::{Circle, Shape, TransformedPolygon},
    },
    error::{PhysicsError, Result},
    utils::{
        allocator::{Arena, BodyHandle},
        math::{cross, normalize_or_axis, DEGENERATE_EPSILON},
    },
};

use super::shapes::{Aabb, ShapeUtil};

/// Half-line with a unit direction, optionally limited in length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec2,
    direction: Vec2,
    pub max_distance: f32,
}

impl Ray {
    /// Normalizes `direction`; zero or non-finite directions are rejected.
    pub fn new(origin: Vec2, direction: Vec2) -> Result<Self> {
        let length = direction.length();
        if !length.is_finite() || length <= DEGENERATE_EPSILON || !origin.is_finite() {
            return Err(PhysicsError::DegenerateRay);
        }
        Ok(Self {
            origin,
            direction: direction / length,
            max_distance: f32::INFINITY,
        })
    }

    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn point_at(&self, distance: f32) -> Vec2 {
        self.origin + self.direction * distance
    }
}

/// First intersection of a ray with one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub body: BodyHandle,
    pub point: Vec2,
    pub normal: Vec2,
    pub distance: f32,
}

/// Read-only spatial queries over a body collection.
pub struct Raycast;

impl Raycast {
    /// Every hit along the ray, nearest first. Equal distances keep arena order.
    pub fn cast_all(ray: &Ray, bodies: &Arena<RigidBody>) -> Vec<RaycastHit> {
        let mut hits: Vec<RaycastHit> = bodies
            .iter()
            .filter(|(_, body)| Self::ray_aabb(ray, &ShapeUtil::world_bounds(body)))
            .filter_map(|(handle, body)| Self::cast_body(ray, handle, body))
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Nearest hit along the ray. Equal distances resolve to the lower slot.
    pub fn cast(ray: &Ray, bodies: &Arena<RigidBody>) -> Option<RaycastHit> {
        bodies
            .iter()
            .filter(|(_, body)| Self::ray_aabb(ray, &ShapeUtil::world_bounds(body)))
            .filter_map(|(handle, body)| Self::cast_body(ray, handle, body))
            .fold(None, |nearest: Option<RaycastHit>, hit| match nearest {
                Some(best) if best.distance <= hit.distance => Some(best),
                _ => Some(hit),
            })
    }

    /// Exact ray test against a single body, ignoring its bounds.
    pub fn cast_body(ray: &Ray, handle: BodyHandle, body: &RigidBody) -> Option<RaycastHit> {
        let (distance, normal) = match body.shape() {
            Shape::Circle(circle) => Self::ray_circle(ray, body.position(), circle)?,
            Shape::Polygon(_) => Self::ray_polygon(ray, body.position(), body.world_polygon()?)?,
        };
        if distance > ray.max_distance {
            return None;
        }
        Some(RaycastHit {
            body: handle,
            point: ray.point_at(distance),
            normal,
            distance,
        })
    }

    /// Bodies whose shape strictly contains `point`, in arena order.
    pub fn point_query(point: Vec2, bodies: &Arena<RigidBody>) -> Vec<BodyHandle> {
        bodies
            .iter()
            .filter(|(_, body)| ShapeUtil::world_bounds(body).contains(point))
            .filter(|(_, body)| ShapeUtil::contains_point(body, point))
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Slab test; true when the ray passes through the box within its range.
    pub fn ray_aabb(ray: &Ray, bounds: &Aabb) -> bool {
        let mut t_min = 0.0_f32;
        let mut t_max = ray.max_distance;

        for axis in 0..2 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let (min, max) = (bounds.min[axis], bounds.max[axis]);

            if direction.abs() < DEGENERATE_EPSILON {
                if origin < min || origin > max {
                    return false;
                }
            } else {
                let inv = 1.0 / direction;
                let mut t1 = (min - origin) * inv;
                let mut t2 = (max - origin) * inv;
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }
                t_min = t_min.max(t1);
                t_max = t_max.min(t2);
                if t_min > t_max {
                    return false;
                }
            }
        }
        true
    }

    /// Entry distance, or the exit distance when the origin is inside.
    fn ray_circle(ray: &Ray, center: Vec2, circle: &Circle) -> Option<(f32, Vec2)> {
        let offset = ray.origin - center;
        let projection = -ray.direction.dot(offset);
        let radius = circle.radius();
        let discriminant = projection * projection - offset.length_squared() + radius * radius;
        if discriminant < 0.0 {
            return None;
        }

        let half_chord = discriminant.sqrt();
        let t = if projection - half_chord > 0.0 {
            projection - half_chord
        } else {
            projection + half_chord
        };
        if t < 0.0 {
            return None;
        }
        let normal = normalize_or_axis(ray.point_at(t) - center);
        Some((t, normal))
    }

    /// Nearest front-facing edge crossing. Back faces are culled, so a ray
    /// starting inside a polygon reports no hit.
    fn ray_polygon(
        ray: &Ray,
        position: Vec2,
        polygon: &TransformedPolygon,
    ) -> Option<(f32, Vec2)> {
        let mut nearest: Option<(f32, Vec2)> = None;

        for (i, normal) in polygon.normals.iter().enumerate() {
            let (start, end) = polygon.edge(i);
            let to_origin = ray.origin - (position + start);
            let edge = end - start;

            let denom = cross(ray.direction, edge);
            if denom >= 0.0 {
                continue;
            }

            let t = cross(edge, to_origin) / denom;
            let s = cross(ray.direction, to_origin) / denom;
            if t > 0.0 && (0.0..=1.0).contains(&s) && nearest.map_or(true, |(best, _)| t < best) {
                nearest = Some((t, *normal));
            }
        }

        nearest
    }
}
