use glam::Vec2;

const EPSILON: f32 = 1e-6;

/// Half-plane in 2D. Points with non-positive signed distance are inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vec2,
    distance: f32,
}

impl Plane {
    pub fn from_point_normal(point: Vec2, normal: Vec2) -> Self {
        let n = normal.normalize_or_zero();
        Self {
            normal: n,
            distance: n.dot(point),
        }
    }

    pub fn signed_distance(&self, point: Vec2) -> f32 {
        self.normal.dot(point) - self.distance
    }
}

/// The two side planes bounding the segment `start -> end`, facing outward
/// along the segment direction.
pub fn side_planes(start: Vec2, end: Vec2) -> [Plane; 2] {
    let tangent = (end - start).normalize_or_zero();
    [
        Plane::from_point_normal(start, -tangent),
        Plane::from_point_normal(end, tangent),
    ]
}

/// Clips a segment against one plane, replacing the outside endpoint with
/// the crossing point. Returns `None` when the whole segment is outside.
pub fn clip_segment(segment: [Vec2; 2], plane: Plane) -> Option<[Vec2; 2]> {
    let [start, end] = segment;
    let start_dist = plane.signed_distance(start);
    let end_dist = plane.signed_distance(end);

    let start_inside = start_dist <= EPSILON;
    let end_inside = end_dist <= EPSILON;

    match (start_inside, end_inside) {
        (true, true) => Some(segment),
        (false, false) => None,
        (true, false) => Some([start, intersection(start, end, start_dist, end_dist)?]),
        (false, true) => Some([intersection(start, end, start_dist, end_dist)?, end]),
    }
}

/// Clips a segment against every plane in turn.
pub fn clip_segment_to_planes(segment: [Vec2; 2], planes: &[Plane]) -> Option<[Vec2; 2]> {
    planes
        .iter()
        .try_fold(segment, |clipped, plane| clip_segment(clipped, *plane))
}

fn intersection(start: Vec2, end: Vec2, start_dist: f32, end_dist: f32) -> Option<Vec2> {
    let denom = start_dist - end_dist;
    if denom.abs() <= EPSILON {
        return None;
    }
    let t = start_dist / denom;
    Some(start + (end - start) * t)
}
