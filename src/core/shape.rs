use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{
    collision::shapes::Aabb,
    error::{PhysicsError, Result},
    utils::math::{cross, edge_normal, rotate},
};

const GEOMETRY_EPSILON: f32 = 1e-6;

/// Immutable collision geometry in body-local space.
///
/// The variant set is closed so narrow-phase dispatch can match exhaustively
/// over every shape pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle(Circle),
    Polygon(Polygon),
}

impl Shape {
    pub fn circle(radius: f32) -> Result<Self> {
        Circle::new(radius).map(Shape::Circle)
    }

    pub fn polygon(vertices: Vec<Vec2>) -> Result<Self> {
        Polygon::new(vertices).map(Shape::Polygon)
    }

    /// Axis-aligned rectangle centered on the body origin.
    pub fn rectangle(width: f32, height: f32) -> Result<Self> {
        Polygon::rectangle(width, height).map(Shape::Polygon)
    }

    /// Returns `(mass, rotational_inertia)` for the given density.
    pub fn compute_mass(&self, density: f32) -> (f32, f32) {
        match self {
            Shape::Circle(circle) => circle.compute_mass(density),
            Shape::Polygon(polygon) => polygon.compute_mass(density),
        }
    }

    /// Bounds of the unrotated shape around the body origin.
    pub fn local_bounds(&self) -> Aabb {
        match self {
            Shape::Circle(circle) => {
                Aabb::from_center_half_extents(Vec2::ZERO, Vec2::splat(circle.radius))
            }
            Shape::Polygon(polygon) => Aabb::from_points(&polygon.vertices),
        }
    }

    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Shape::Polygon(polygon) => Some(polygon),
            Shape::Circle(_) => None,
        }
    }
}

/// Circle centered on the body origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Circle {
    radius: f32,
}

impl Circle {
    pub fn new(radius: f32) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(PhysicsError::InvalidRadius(radius));
        }
        Ok(Self { radius })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn compute_mass(&self, density: f32) -> (f32, f32) {
        let radius_sq = self.radius * self.radius;
        let mass = PI * radius_sq * density;
        (mass, mass * radius_sq / 2.0)
    }
}

impl TryFrom<f32> for Circle {
    type Error = PhysicsError;

    fn try_from(radius: f32) -> Result<Self> {
        Circle::new(radius)
    }
}

impl From<Circle> for f32 {
    fn from(circle: Circle) -> Self {
        circle.radius
    }
}

/// Convex polygon wound counter-clockwise, with one outward normal per edge.
///
/// Edge `i` runs from `vertices[i]` to `vertices[(i + 1) % n]` and
/// `normals[i]` faces away from the interior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec2>", into = "Vec<Vec2>")]
pub struct Polygon {
    vertices: Vec<Vec2>,
    normals: Vec<Vec2>,
}

impl Polygon {
    /// Validates and builds a polygon.
    ///
    /// Fails on fewer than three vertices, non-finite coordinates, repeated
    /// consecutive vertices, clockwise winding, concavity (including
    /// self-intersection) and zero area.
    pub fn new(vertices: Vec<Vec2>) -> Result<Self> {
        let count = vertices.len();
        if count < 3 {
            return Err(PhysicsError::TooFewVertices(count));
        }
        if let Some(index) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(PhysicsError::NonFiniteVertex(index));
        }

        let mut normals = Vec::with_capacity(count);
        for (i, (a, b)) in edges(&vertices).enumerate() {
            if a.distance_squared(b) <= GEOMETRY_EPSILON * GEOMETRY_EPSILON {
                return Err(PhysicsError::DegenerateEdge(i));
            }
            normals.push(edge_normal(a, b));
        }

        // Every vertex must lie on or behind every face.
        let scale = vertices
            .iter()
            .map(|v| v.length())
            .fold(1.0_f32, f32::max);
        for (i, normal) in normals.iter().enumerate() {
            let face = vertices[i];
            if vertices
                .iter()
                .any(|v| (*v - face).dot(*normal) > GEOMETRY_EPSILON * scale)
            {
                return Err(PhysicsError::ConcavePolygon((i + 1) % count));
            }
        }

        let doubled_area: f32 = edges(&vertices).map(|(a, b)| cross(a, b)).sum();
        if doubled_area <= GEOMETRY_EPSILON {
            return Err(PhysicsError::ZeroArea);
        }

        Ok(Self { vertices, normals })
    }

    pub fn rectangle(width: f32, height: f32) -> Result<Self> {
        let w = width / 2.0;
        let h = height / 2.0;
        Self::new(vec![
            Vec2::new(w, h),
            Vec2::new(-w, h),
            Vec2::new(-w, -h),
            Vec2::new(w, -h),
        ])
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Triangle-fan mass and inertia about the body origin.
    pub fn compute_mass(&self, density: f32) -> (f32, f32) {
        let mut total = 0.0;
        let mut area = 0.0;
        let mut moment = 0.0;

        for (a, b) in edges(&self.vertices) {
            let fan = cross(a, b).abs();
            total += fan;
            area += fan / 2.0;
            moment += fan * (a.dot(a) + b.dot(b) + a.dot(b));
        }

        let mass = area * density;
        let inertia = if total > 0.0 {
            mass * moment / (6.0 * total)
        } else {
            0.0
        };
        (mass, inertia)
    }

    /// Rotates vertices and normals into world-facing orientation.
    pub fn transform(&self, angle: f32) -> TransformedPolygon {
        let mut transformed = TransformedPolygon::default();
        transformed.update(self, angle);
        transformed
    }
}

impl TryFrom<Vec<Vec2>> for Polygon {
    type Error = PhysicsError;

    fn try_from(vertices: Vec<Vec2>) -> Result<Self> {
        Polygon::new(vertices)
    }
}

impl From<Polygon> for Vec<Vec2> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

/// Polygon geometry rotated by a body's angle, still relative to its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformedPolygon {
    pub vertices: Vec<Vec2>,
    pub normals: Vec<Vec2>,
}

impl TransformedPolygon {
    /// Rewrites the cache in place, reusing its allocations.
    pub fn update(&mut self, polygon: &Polygon, angle: f32) {
        self.vertices.clear();
        self.normals.clear();
        self.vertices
            .extend(polygon.vertices.iter().map(|v| rotate(*v, angle)));
        self.normals
            .extend(polygon.normals.iter().map(|n| rotate(*n, angle)));
    }

    pub fn edge(&self, index: usize) -> (Vec2, Vec2) {
        let count = self.vertices.len();
        (self.vertices[index % count], self.vertices[(index + 1) % count])
    }
}

/// Consecutive vertex pairs, wrapping around at the end.
pub(crate) fn edges(vertices: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let count = vertices.len();
    (0..count).map(move |i| (vertices[i], vertices[(i + 1) % count]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn circle_mass_matches_closed_form() {
        let (mass, inertia) = Circle::new(2.0).unwrap().compute_mass(0.5);
        assert_relative_eq!(mass, PI * 2.0, epsilon = 1e-5);
        assert_relative_eq!(inertia, mass * 2.0, epsilon = 1e-5);
    }

    #[test]
    fn rectangle_mass_matches_box_formula() {
        let rect = Polygon::rectangle(2.0, 4.0).unwrap();
        let (mass, inertia) = rect.compute_mass(1.5);
        assert_relative_eq!(mass, 12.0, epsilon = 1e-5);
        assert_relative_eq!(inertia, 12.0 * (4.0 + 16.0) / 12.0, epsilon = 1e-4);
    }

    #[test]
    fn invalid_circles_are_rejected() {
        assert_eq!(Circle::new(0.0), Err(PhysicsError::InvalidRadius(0.0)));
        assert_eq!(Circle::new(-1.0), Err(PhysicsError::InvalidRadius(-1.0)));
        assert!(Circle::new(f32::NAN).is_err());
    }

    #[test]
    fn concave_polygon_is_rejected() {
        let arrow = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, -1.0),
            Vec2::new(0.5, 0.0),
            Vec2::new(2.0, 1.0),
        ];
        assert!(matches!(
            Polygon::new(arrow),
            Err(PhysicsError::ConcavePolygon(_))
        ));
    }

    #[test]
    fn clockwise_winding_is_rejected() {
        let clockwise = vec![
            Vec2::new(-1.0, -1.0),
            Vec2::new(-1.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, -1.0),
        ];
        assert!(matches!(
            Polygon::new(clockwise),
            Err(PhysicsError::ConcavePolygon(_))
        ));
    }

    #[test]
    fn degenerate_polygons_are_rejected() {
        assert_eq!(
            Polygon::new(vec![Vec2::ZERO, Vec2::X]),
            Err(PhysicsError::TooFewVertices(2))
        );
        assert_eq!(
            Polygon::new(vec![Vec2::ZERO, Vec2::ZERO, Vec2::Y]),
            Err(PhysicsError::DegenerateEdge(0))
        );
        assert_eq!(
            Polygon::new(vec![Vec2::ZERO, Vec2::X, Vec2::new(2.0, 0.0)]),
            Err(PhysicsError::ZeroArea)
        );
        assert_eq!(
            Polygon::new(vec![Vec2::ZERO, Vec2::new(f32::INFINITY, 0.0), Vec2::Y]),
            Err(PhysicsError::NonFiniteVertex(1))
        );
    }

    #[test]
    fn normals_point_outward() {
        let square = Polygon::rectangle(2.0, 2.0).unwrap();
        for (vertex, normal) in square.vertices().iter().zip(square.normals()) {
            assert!(vertex.dot(*normal) > 0.0);
            assert_relative_eq!(normal.length(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn transform_rotates_geometry() {
        let square = Polygon::rectangle(2.0, 2.0).unwrap();
        let rotated = square.transform(std::f32::consts::FRAC_PI_2);
        // First vertex (1, 1) maps to (-1, 1).
        assert_relative_eq!(rotated.vertices[0].x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(rotated.vertices[0].y, 1.0, epsilon = 1e-6);
        // Top face normal (0, 1) maps to (-1, 0).
        assert_relative_eq!(rotated.normals[0].x, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn polygon_deserializes_through_validation() {
        let json = "[[1.0,1.0],[-1.0,1.0],[-1.0,-1.0],[1.0,-1.0]]";
        let polygon: Polygon = serde_json::from_str(json).unwrap();
        assert_eq!(polygon.len(), 4);

        let clockwise = "[[1.0,-1.0],[-1.0,-1.0],[-1.0,1.0],[1.0,1.0]]";
        assert!(serde_json::from_str::<Polygon>(clockwise).is_err());
    }
}
