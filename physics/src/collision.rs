//! Narrow-phase collision predicates between transformed shapes.
//!
//! Every predicate produces a [`Collision`]: a world-space normal pointing
//! from shape A toward shape B and up to two contact points tagged with
//! stable feature ids. Polygon pairs go through SAT over both polygons' edge
//! normals, then reference/incident face selection and a two-plane
//! Sutherland-Hodgman clip.

use glam::DVec2;

use crate::contact::FeatureId;
use crate::math::Transform;
use crate::shape::{Polygon, Shape, ShapeKind};

/// Tolerance used when comparing the two polygons' best separation axes, so
/// frame-to-frame numerical noise cannot flip the reference face. On a
/// near-tie shape A's axis wins.
const AXIS_PREFERENCE_SLOP: f64 = 0.005;

/// A candidate contact point in world space.
#[derive(Clone, Copy, Debug)]
pub struct ContactPoint {
    pub position: DVec2,
    /// Negative when penetrating.
    pub separation: f64,
    pub feature: FeatureId,
}

/// Result of one narrow-phase test. `point_count == 0` means the shapes do
/// not touch.
#[derive(Clone, Copy, Debug)]
pub struct Collision {
    /// World-space normal from shape A toward shape B; zero when there is no
    /// contact.
    pub normal: DVec2,
    pub point_count: usize,
    pub points: [ContactPoint; 2],
}

impl Collision {
    fn none() -> Collision {
        Collision {
            normal: DVec2::ZERO,
            point_count: 0,
            points: [ContactPoint {
                position: DVec2::ZERO,
                separation: 0.0,
                feature: FeatureId::circle(),
            }; 2],
        }
    }

    fn single(normal: DVec2, point: ContactPoint) -> Collision {
        let mut collision = Collision::none();
        collision.normal = normal;
        collision.points[0] = point;
        collision.point_count = 1;
        collision
    }

    pub fn points(&self) -> &[ContactPoint] {
        &self.points[..self.point_count]
    }

    fn flip_normal(mut self) -> Collision {
        self.normal = -self.normal;
        self
    }
}

/// Dispatch on the two shape kinds. Refreshes polygon world-vertex caches as
/// a side effect.
pub fn collide(
    shape_a: &mut Shape,
    transform_a: Transform,
    shape_b: &mut Shape,
    transform_b: Transform,
) -> Collision {
    shape_a.transform(transform_a);
    shape_b.transform(transform_b);

    match (shape_a.kind(), shape_b.kind()) {
        (
            ShapeKind::Circle { center: ca, radius: ra },
            ShapeKind::Circle { center: cb, radius: rb },
        ) => circle_circle(transform_a.apply(*ca), *ra, transform_b.apply(*cb), *rb),
        (ShapeKind::Circle { center, radius }, ShapeKind::Polygon(polygon)) => {
            polygon_circle(polygon, transform_a.apply(*center), *radius).flip_normal()
        }
        (ShapeKind::Polygon(polygon), ShapeKind::Circle { center, radius }) => {
            polygon_circle(polygon, transform_b.apply(*center), *radius)
        }
        (ShapeKind::Polygon(polygon_a), ShapeKind::Polygon(polygon_b)) => {
            polygon_polygon(polygon_a, polygon_b)
        }
    }
}

/// Circles touch iff their center distance is below the radius sum. The
/// single contact sits on A's boundary; coincident centers fall back to an
/// upward normal instead of faulting.
fn circle_circle(center_a: DVec2, radius_a: f64, center_b: DVec2, radius_b: f64) -> Collision {
    let dir = center_b - center_a;
    let distance = dir.length();
    if distance >= radius_a + radius_b {
        return Collision::none();
    }
    let normal = dir.try_normalize().unwrap_or(DVec2::Y);
    Collision::single(
        normal,
        ContactPoint {
            position: center_a + normal * radius_a,
            separation: distance - (radius_a + radius_b),
            feature: FeatureId::circle(),
        },
    )
}

/// Circle against a polygon's edge SAT. The normal is the least-penetration
/// edge axis (pointing polygon -> circle), the contact is the closest point
/// on that edge, and the feature id is the edge index.
fn polygon_circle(polygon: &Polygon, center: DVec2, radius: f64) -> Collision {
    let vertices = polygon.world_vertices();
    let n = vertices.len();

    let mut best_separation = f64::NEG_INFINITY;
    let mut best_edge = 0;
    for i in 0..n {
        let normal = edge_normal(vertices, i);
        let separation = normal.dot(center - vertices[i]);
        if separation > radius {
            // Separating axis.
            return Collision::none();
        }
        if separation > best_separation {
            best_separation = separation;
            best_edge = i;
        }
    }

    let v1 = vertices[best_edge];
    let v2 = vertices[(best_edge + 1) % n];
    let closest = closest_point_on_segment(center, v1, v2);

    let separation = if best_separation > 0.0 {
        // Center outside the face plane: the true distance decides, which
        // also rejects the corner region the per-edge projection misses.
        let distance = (center - closest).length();
        if distance >= radius {
            return Collision::none();
        }
        distance - radius
    } else {
        best_separation - radius
    };

    Collision::single(
        edge_normal(vertices, best_edge),
        ContactPoint {
            position: closest,
            separation,
            feature: FeatureId::edge(best_edge as u8),
        },
    )
}

/// SAT over both polygons' edge normals, then clip the incident face against
/// the reference face's side planes and keep the penetrating points.
fn polygon_polygon(polygon_a: &Polygon, polygon_b: &Polygon) -> Collision {
    let verts_a = polygon_a.world_vertices();
    let verts_b = polygon_b.world_vertices();

    let (separation_a, edge_a) = max_separation(verts_a, verts_b);
    if separation_a > 0.0 {
        return Collision::none();
    }
    let (separation_b, edge_b) = max_separation(verts_b, verts_a);
    if separation_b > 0.0 {
        return Collision::none();
    }

    // Reference face = axis of least penetration. A wins near-ties so the
    // choice cannot oscillate between frames.
    let (reference, incident, reference_edge, flipped) = if separation_b > separation_a + AXIS_PREFERENCE_SLOP {
        (verts_b, verts_a, edge_b, true)
    } else {
        (verts_a, verts_b, edge_a, false)
    };

    let normal = edge_normal(reference, reference_edge);
    let v1 = reference[reference_edge];
    let v2 = reference[(reference_edge + 1) % reference.len()];
    let tangent = (v2 - v1).normalize_or_zero();

    let incident_edge = incident_edge_index(incident, normal);
    let i1 = incident[incident_edge];
    let i2 = incident[(incident_edge + 1) % incident.len()];

    // Clip the incident edge between the two side planes of the reference
    // face. Fewer than two surviving points means a degenerate overlap.
    let first = [(i1, 0u8), (i2, 1u8)];
    let Some(second) = clip_segment(first, -tangent, -tangent.dot(v1), 0) else {
        return Collision::none();
    };
    let Some(clipped) = clip_segment(second, tangent, tangent.dot(v2), 1) else {
        return Collision::none();
    };

    let mut collision = Collision::none();
    collision.normal = if flipped { -normal } else { normal };
    for (point, side) in clipped {
        let separation = normal.dot(point - v1);
        if separation <= 0.0 {
            collision.points[collision.point_count] = ContactPoint {
                position: point,
                separation,
                feature: FeatureId::clipped(
                    reference_edge as u8,
                    incident_edge as u8,
                    side,
                    flipped,
                ),
            };
            collision.point_count += 1;
        }
    }
    collision
}

/// Outward normal of the world-space edge `vertices[i] -> vertices[i + 1]`
/// (counter-clockwise winding).
fn edge_normal(vertices: &[DVec2], i: usize) -> DVec2 {
    let edge = vertices[(i + 1) % vertices.len()] - vertices[i];
    DVec2::new(edge.y, -edge.x).normalize_or_zero()
}

/// Best (largest) separation of `other` against the edge axes of `vertices`,
/// and the edge that realizes it.
fn max_separation(vertices: &[DVec2], other: &[DVec2]) -> (f64, usize) {
    let mut best = f64::NEG_INFINITY;
    let mut best_edge = 0;
    for i in 0..vertices.len() {
        let normal = edge_normal(vertices, i);
        let mut min_projection = f64::INFINITY;
        for &p in other {
            min_projection = min_projection.min(normal.dot(p - vertices[i]));
        }
        if min_projection > best {
            best = min_projection;
            best_edge = i;
        }
    }
    (best, best_edge)
}

/// Edge of `vertices` most anti-parallel to the reference normal.
fn incident_edge_index(vertices: &[DVec2], reference_normal: DVec2) -> usize {
    let mut best = f64::INFINITY;
    let mut best_edge = 0;
    for i in 0..vertices.len() {
        let dot = edge_normal(vertices, i).dot(reference_normal);
        if dot < best {
            best = dot;
            best_edge = i;
        }
    }
    best_edge
}

/// Keep the segment points with `dot(normal, p) <= offset`; a crossing point
/// is replaced by the plane intersection and inherits the clip plane's side
/// marker. Returns `None` when fewer than two points survive.
fn clip_segment(
    points: [(DVec2, u8); 2],
    normal: DVec2,
    offset: f64,
    clip_side: u8,
) -> Option<[(DVec2, u8); 2]> {
    let d0 = normal.dot(points[0].0) - offset;
    let d1 = normal.dot(points[1].0) - offset;

    let mut out = [points[0], points[1]];
    let mut count = 0;
    if d0 <= 0.0 {
        out[count] = points[0];
        count += 1;
    }
    if d1 <= 0.0 {
        out[count] = points[1];
        count += 1;
    }
    if d0 * d1 < 0.0 && count < 2 {
        let t = d0 / (d0 - d1);
        out[count] = (points[0].0 + (points[1].0 - points[0].0) * t, clip_side);
        count += 1;
    }
    (count == 2).then_some(out)
}

fn closest_point_on_segment(point: DVec2, a: DVec2, b: DVec2) -> DVec2 {
    let ab = b - a;
    let length_squared = ab.length_squared();
    if length_squared == 0.0 {
        return a;
    }
    let t = ((point - a).dot(ab) / length_squared).clamp(0.0, 1.0);
    a + ab * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Transform;
    use crate::shape::Shape;
    use glam::dvec2;

    fn at(x: f64, y: f64) -> Transform {
        Transform::new(dvec2(x, y), 0.0)
    }

    #[test]
    fn circles_overlap_and_separate() {
        let mut a = Shape::circle(DVec2::ZERO, 1.0).unwrap();
        let mut b = Shape::circle(DVec2::ZERO, 1.0).unwrap();

        let hit = collide(&mut a, at(0.0, 0.0), &mut b, at(1.5, 0.0));
        assert_eq!(hit.point_count, 1);
        assert!((hit.normal - dvec2(1.0, 0.0)).length() < 1e-12);
        assert!((hit.points[0].separation + 0.5).abs() < 1e-12);
        assert!((hit.points[0].position - dvec2(1.0, 0.0)).length() < 1e-12);

        let miss = collide(&mut a, at(0.0, 0.0), &mut b, at(2.5, 0.0));
        assert_eq!(miss.point_count, 0);
    }

    #[test]
    fn coincident_circles_pick_an_upward_normal() {
        let mut a = Shape::circle(DVec2::ZERO, 1.0).unwrap();
        let mut b = Shape::circle(DVec2::ZERO, 1.0).unwrap();
        let hit = collide(&mut a, at(3.0, 3.0), &mut b, at(3.0, 3.0));
        assert_eq!(hit.point_count, 1);
        assert_eq!(hit.normal, DVec2::Y);
    }

    #[test]
    fn circle_on_box_face() {
        let mut circle = Shape::circle(DVec2::ZERO, 0.5).unwrap();
        let mut ground = Shape::rect(10.0, 2.0, DVec2::ZERO).unwrap();

        // Circle is shape A above the box: normal must point from A to B,
        // i.e. downward.
        let hit = collide(&mut circle, at(0.0, 1.4), &mut ground, at(0.0, 0.0));
        assert_eq!(hit.point_count, 1);
        assert!((hit.normal - dvec2(0.0, -1.0)).length() < 1e-9);
        assert!((hit.points[0].separation + 0.1).abs() < 1e-9);
        assert_eq!(hit.points[0].feature, FeatureId::edge(2));
    }

    #[test]
    fn circle_clears_box_corner() {
        let mut circle = Shape::circle(DVec2::ZERO, 0.5).unwrap();
        let mut ground = Shape::rect(2.0, 2.0, DVec2::ZERO).unwrap();
        // Diagonal from the corner (1, 1): center distance ~0.57, over the
        // radius even though both edge projections are under it.
        let hit = collide(&mut circle, at(1.4, 1.4), &mut ground, at(0.0, 0.0));
        assert_eq!(hit.point_count, 0);
    }

    #[test]
    fn boxes_produce_two_point_manifold() {
        let mut a = Shape::rect(2.0, 2.0, DVec2::ZERO).unwrap();
        let mut b = Shape::rect(2.0, 2.0, DVec2::ZERO).unwrap();

        let hit = collide(&mut a, at(0.0, 0.0), &mut b, at(1.8, 0.0));
        assert_eq!(hit.point_count, 2);
        assert!((hit.normal - dvec2(1.0, 0.0)).length() < 1e-9);
        for point in hit.points() {
            assert!((point.separation + 0.2).abs() < 1e-9);
            assert!((point.position.x - 0.8).abs() < 1e-9);
        }
        // The two points span the overlapping edge.
        assert!((hit.points[0].position.y - hit.points[1].position.y).abs() > 1.9);
    }

    #[test]
    fn separated_boxes_produce_nothing() {
        let mut a = Shape::rect(2.0, 2.0, DVec2::ZERO).unwrap();
        let mut b = Shape::rect(2.0, 2.0, DVec2::ZERO).unwrap();
        assert_eq!(collide(&mut a, at(0.0, 0.0), &mut b, at(2.1, 0.0)).point_count, 0);
    }

    #[test]
    fn feature_ids_are_stable_across_small_motion() {
        let mut a = Shape::rect(2.0, 2.0, DVec2::ZERO).unwrap();
        let mut b = Shape::rect(2.0, 2.0, DVec2::ZERO).unwrap();

        let first = collide(&mut a, at(0.0, 0.0), &mut b, at(0.0, 1.9));
        let second = collide(&mut a, at(0.0, 0.0), &mut b, at(0.001, 1.899));
        assert_eq!(first.point_count, 2);
        assert_eq!(second.point_count, 2);
        for (p, q) in first.points().iter().zip(second.points()) {
            assert_eq!(p.feature, q.feature);
        }
    }

    #[test]
    fn equal_penetration_prefers_shape_a_axis() {
        // Two identical axis-aligned boxes offset diagonally penetrate both
        // axes equally; the reference face must come from A.
        let mut a = Shape::rect(2.0, 2.0, DVec2::ZERO).unwrap();
        let mut b = Shape::rect(2.0, 2.0, DVec2::ZERO).unwrap();
        let hit = collide(&mut a, at(0.0, 0.0), &mut b, at(1.5, 1.5));
        assert!(hit.point_count > 0);
        for point in hit.points() {
            // A's axis: the flipped bit stays unset.
            assert_eq!(point.feature.key() >> 20 & 1, 0);
        }
    }
}
