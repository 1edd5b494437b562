use glam::Vec2;

use crate::{
    core::{
        rigidbody::RigidBody,
        shape::{Circle, Shape, TransformedPolygon},
        types::MaterialPairProperties,
    },
    utils::{
        allocator::BodyHandle,
        math::{cross, normalize_or_axis},
    },
};

use super::{
    clipping::{clip_segment_to_planes, side_planes},
    contact::Manifold,
};

/// A body together with the arena handle it is stored under.
pub type HandledBody<'a> = (BodyHandle, &'a RigidBody);

/// Exact pairwise collision tests, dispatched on the pair of shape variants.
pub struct NarrowPhase;

impl NarrowPhase {
    /// Returns the manifold for an overlapping pair, tagged with the ids the
    /// bodies carry.
    ///
    /// The manifold's `body_a` is not always `a`: polygon-circle pairs put the
    /// polygon first and polygon pairs put the reference face owner first.
    pub fn collide(a: &RigidBody, b: &RigidBody) -> Option<Manifold> {
        Self::collide_handled((a.id(), a), (b.id(), b))
    }

    /// Same as [`NarrowPhase::collide`], but the manifold names the given
    /// handles rather than the bodies' own ids.
    pub fn collide_handled(a: HandledBody<'_>, b: HandledBody<'_>) -> Option<Manifold> {
        match (a.1.shape(), b.1.shape()) {
            (Shape::Circle(circle_a), Shape::Circle(circle_b)) => {
                Self::circle_circle(a, circle_a, b, circle_b)
            }
            (Shape::Polygon(_), Shape::Circle(circle)) => {
                Self::polygon_circle(a, a.1.world_polygon()?, b, circle)
            }
            (Shape::Circle(circle), Shape::Polygon(_)) => {
                Self::polygon_circle(b, b.1.world_polygon()?, a, circle)
            }
            (Shape::Polygon(_), Shape::Polygon(_)) => {
                Self::polygon_polygon(a, a.1.world_polygon()?, b, b.1.world_polygon()?)
            }
        }
    }

    fn circle_circle(
        (handle_a, a): HandledBody<'_>,
        circle_a: &Circle,
        (handle_b, b): HandledBody<'_>,
        circle_b: &Circle,
    ) -> Option<Manifold> {
        let offset = b.position() - a.position();
        let radius = circle_a.radius() + circle_b.radius();
        let distance_sq = offset.length_squared();
        if distance_sq >= radius * radius {
            return None;
        }

        let distance = distance_sq.sqrt();
        let normal = normalize_or_axis(offset);
        Some(Manifold::new(
            handle_a,
            handle_b,
            normal,
            radius - distance,
            &[-normal * circle_b.radius()],
            b.position(),
            pair_material(a, b),
        ))
    }

    fn polygon_circle(
        (polygon_handle, polygon_body): HandledBody<'_>,
        polygon: &TransformedPolygon,
        (circle_handle, circle_body): HandledBody<'_>,
        circle: &Circle,
    ) -> Option<Manifold> {
        let radius = circle.radius();
        let center = circle_body.position() - polygon_body.position();

        let mut face = 0;
        let mut separation = f32::NEG_INFINITY;
        for (i, (vertex, normal)) in polygon.vertices.iter().zip(&polygon.normals).enumerate() {
            let s = (center - *vertex).dot(*normal);
            if s >= radius {
                return None;
            }
            if s > separation {
                separation = s;
                face = i;
            }
        }

        let normal = polygon.normals[face];
        let (start, end) = polygon.edge(face);
        let to_start = center - start;
        let to_end = center - end;

        // Past either end of the face the closest feature is the vertex.
        let corner = if cross(normal, to_end) > 0.0 {
            Some(to_end)
        } else if cross(normal, to_start) < 0.0 {
            Some(to_start)
        } else {
            None
        };

        let (normal, penetration) = match corner {
            Some(offset) => {
                let distance_sq = offset.length_squared();
                if distance_sq >= radius * radius {
                    return None;
                }
                (normalize_or_axis(offset), radius - distance_sq.sqrt())
            }
            None => (normal, radius - separation),
        };

        Some(Manifold::new(
            polygon_handle,
            circle_handle,
            normal,
            penetration,
            &[-normal * radius],
            circle_body.position(),
            pair_material(polygon_body, circle_body),
        ))
    }

    fn polygon_polygon(
        a: HandledBody<'_>,
        polygon_a: &TransformedPolygon,
        b: HandledBody<'_>,
        polygon_b: &TransformedPolygon,
    ) -> Option<Manifold> {
        let offset_ab = b.1.position() - a.1.position();
        let (face_a, penetration_a) = least_penetration_face(polygon_a, polygon_b, offset_ab)?;
        let (face_b, penetration_b) = least_penetration_face(polygon_b, polygon_a, -offset_ab)?;

        // Ties keep A as the reference so the normal direction stays stable.
        let ((reference_handle, reference_body), reference, face, incident_pair, incident) =
            if penetration_a <= penetration_b {
                (a, polygon_a, face_a, b, polygon_b)
            } else {
                (b, polygon_b, face_b, a, polygon_a)
            };
        let (incident_handle, incident_body) = incident_pair;

        // Work in the reference body's frame.
        let incident_offset = incident_body.position() - reference_body.position();
        let normal = reference.normals[face];
        let (ref_start, ref_end) = reference.edge(face);

        let incident_face = (0..incident.normals.len())
            .min_by(|&i, &j| {
                normal
                    .dot(incident.normals[i])
                    .total_cmp(&normal.dot(incident.normals[j]))
            })
            .unwrap_or(0);
        let (inc_start, inc_end) = incident.edge(incident_face);
        let segment = [inc_start + incident_offset, inc_end + incident_offset];

        let clipped = clip_segment_to_planes(segment, &side_planes(ref_start, ref_end))?;

        let mut contacts = [Vec2::ZERO; 2];
        let mut count = 0;
        let mut total_depth = 0.0;
        for point in clipped {
            let depth = -(point - ref_start).dot(normal);
            if depth > 0.0 {
                contacts[count] = point - incident_offset;
                total_depth += depth;
                count += 1;
            }
        }
        if count == 0 {
            return None;
        }

        Some(Manifold::new(
            reference_handle,
            incident_handle,
            normal,
            total_depth / count as f32,
            &contacts[..count],
            incident_body.position(),
            pair_material(reference_body, incident_body),
        ))
    }
}

/// Face of `reference` along which `other` penetrates least, with that depth.
///
/// A face is only a candidate axis if some vertex of `other` lies behind it;
/// otherwise that face separates the shapes and there is no overlap.
fn least_penetration_face(
    reference: &TransformedPolygon,
    other: &TransformedPolygon,
    other_offset: Vec2,
) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;

    for (i, (face, normal)) in reference.vertices.iter().zip(&reference.normals).enumerate() {
        let deepest = other
            .vertices
            .iter()
            .map(|v| -(*v + other_offset - *face).dot(*normal))
            .filter(|depth| *depth > 0.0)
            .fold(None, |max: Option<f32>, depth| {
                Some(max.map_or(depth, |m| m.max(depth)))
            })?;

        if best.map_or(true, |(_, penetration)| deepest < penetration) {
            best = Some((i, deepest));
        }
    }

    best
}

fn pair_material(a: &RigidBody, b: &RigidBody) -> MaterialPairProperties {
    MaterialPairProperties::from_materials(&a.material, &b.material)
}
