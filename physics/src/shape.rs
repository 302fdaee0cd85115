//! Collision shapes: circles and convex polygons.
//!
//! A shape describes geometry in the local frame of the body it is attached
//! to. Polygons keep their outward edge normals precomputed and cache their
//! world-space vertices per `(origin, angle)` placement, so the narrow phase
//! can transform each polygon at most once per step.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::DVec2;

use crate::error::PhysicsError;
use crate::math::{rotate, Aabb, Transform, PI};

/// Unique shape identity, monotonically increasing over the whole process.
pub type ShapeId = u64;

/// Upper bound on convex polygon vertex count.
pub const MAX_POLYGON_VERTICES: usize = 16;

static NEXT_SHAPE_ID: AtomicU64 = AtomicU64::new(1);

fn next_shape_id() -> ShapeId {
    NEXT_SHAPE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Mass, centroid and moment of inertia of a shape at a given density.
/// The inertia is taken about the centroid; callers translate it with the
/// parallel axis theorem when summing shapes into a body.
#[derive(Clone, Copy, Debug)]
pub struct MassProperties {
    pub mass: f64,
    pub centroid: DVec2,
    pub inertia: f64,
}

/// Convex polygon data.
///
/// `vertices` are local, counter-clockwise. Convexity and winding are a
/// precondition of [`Shape::polygon`], not something it validates; a
/// `debug_assert` catches reversed winding in development builds.
#[derive(Clone, Debug)]
pub struct Polygon {
    vertices: Vec<DVec2>,
    normals: Vec<DVec2>,
    world_vertices: Vec<DVec2>,
    cached_for: Option<Transform>,
}

impl Polygon {
    fn new(vertices: Vec<DVec2>) -> Polygon {
        let n = vertices.len();
        let mut normals = Vec::with_capacity(n);
        for i in 0..n {
            let edge = vertices[(i + 1) % n] - vertices[i];
            // Outward for counter-clockwise winding.
            normals.push(DVec2::new(edge.y, -edge.x).normalize_or_zero());
        }
        let world_vertices = vec![DVec2::ZERO; n];
        Polygon {
            vertices,
            normals,
            world_vertices,
            cached_for: None,
        }
    }

    /// Local vertices, counter-clockwise.
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    /// Outward normal of the edge `vertices[i] -> vertices[i + 1]`.
    pub fn normals(&self) -> &[DVec2] {
        &self.normals
    }

    /// World-space vertices from the most recent [`Polygon::transform`] call.
    pub fn world_vertices(&self) -> &[DVec2] {
        debug_assert!(self.cached_for.is_some(), "polygon was never transformed");
        &self.world_vertices
    }

    /// Rotate-then-translate every local vertex into the world-vertex cache.
    /// A repeated call with the same placement is free.
    pub fn transform(&mut self, transform: Transform) {
        if self.cached_for == Some(transform) {
            return;
        }
        for (world, local) in self.world_vertices.iter_mut().zip(&self.vertices) {
            *world = transform.apply(*local);
        }
        self.cached_for = Some(transform);
    }

    fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        let mut area = 0.0;
        for i in 0..n {
            area += self.vertices[i].perp_dot(self.vertices[(i + 1) % n]);
        }
        area / 2.0
    }
}

#[derive(Clone, Debug)]
pub enum ShapeKind {
    Circle { center: DVec2, radius: f64 },
    Polygon(Polygon),
}

/// A collision shape with a process-unique identity.
///
/// A shape belongs to at most one body at a time; its lifetime ends with the
/// owning body unless it is detached first.
#[derive(Clone, Debug)]
pub struct Shape {
    id: ShapeId,
    kind: ShapeKind,
}

impl Shape {
    /// Circle with a local center offset. Fails if `radius <= 0`.
    pub fn circle(center: DVec2, radius: f64) -> Result<Shape, PhysicsError> {
        if !(radius > 0.0) {
            return Err(PhysicsError::InvalidRadius(radius));
        }
        Ok(Shape {
            id: next_shape_id(),
            kind: ShapeKind::Circle { center, radius },
        })
    }

    /// Convex polygon from counter-clockwise local vertices, each translated
    /// by `offset`. Fails unless `3 <= vertices.len() <= 16`; convexity and
    /// winding are the caller's responsibility.
    pub fn polygon(vertices: Vec<DVec2>, offset: DVec2) -> Result<Shape, PhysicsError> {
        if vertices.len() < 3 || vertices.len() > MAX_POLYGON_VERTICES {
            return Err(PhysicsError::InvalidVertexCount(vertices.len()));
        }
        let polygon = Polygon::new(vertices.into_iter().map(|v| v + offset).collect());
        debug_assert!(polygon.signed_area() > 0.0, "vertices must wind counter-clockwise");
        Ok(Shape {
            id: next_shape_id(),
            kind: ShapeKind::Polygon(polygon),
        })
    }

    /// `width` x `height` box centered on `offset`, axes along the local
    /// frame.
    pub fn rect(width: f64, height: f64, offset: DVec2) -> Result<Shape, PhysicsError> {
        let w = width / 2.0;
        let h = height / 2.0;
        Shape::polygon(
            vec![
                DVec2::new(-w, -h),
                DVec2::new(w, -h),
                DVec2::new(w, h),
                DVec2::new(-w, h),
            ],
            offset,
        )
    }

    /// Regular `n`-gon with circumradius `radius` centered on `offset`.
    pub fn regular_polygon(n: usize, radius: f64, offset: DVec2) -> Result<Shape, PhysicsError> {
        if n < 3 || n > MAX_POLYGON_VERTICES {
            return Err(PhysicsError::InvalidVertexCount(n));
        }
        let mut arm = DVec2::new(radius, 0.0);
        let mut vertices = Vec::with_capacity(n);
        for _ in 0..n {
            vertices.push(arm);
            arm = rotate(arm, 2.0 * PI / n as f64);
        }
        Shape::polygon(vertices, offset)
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Refresh the world-vertex cache for polygons; no-op for circles.
    pub(crate) fn transform(&mut self, transform: Transform) {
        if let ShapeKind::Polygon(polygon) = &mut self.kind {
            polygon.transform(transform);
        }
    }

    /// World-space bounding box of the shape under `transform`.
    pub fn aabb(&mut self, transform: Transform) -> Aabb {
        match &mut self.kind {
            ShapeKind::Circle { center, radius } => {
                let position = transform.apply(*center);
                Aabb::new(
                    position.x - *radius,
                    position.y - *radius,
                    position.x + *radius,
                    position.y + *radius,
                )
            }
            ShapeKind::Polygon(polygon) => {
                polygon.transform(transform);
                Aabb::from_points(polygon.world_vertices())
            }
        }
    }

    /// Mass, centroid (local) and inertia about the centroid at `density`.
    pub fn mass_properties(&self, density: f64) -> MassProperties {
        match &self.kind {
            ShapeKind::Circle { center, radius } => {
                let mass = density * PI * radius * radius;
                MassProperties {
                    mass,
                    centroid: *center,
                    inertia: 0.5 * mass * radius * radius,
                }
            }
            ShapeKind::Polygon(polygon) => {
                // Shoelace sums over the triangle fan from the local origin.
                let vertices = polygon.vertices();
                let n = vertices.len();
                let mut area = 0.0;
                let mut centroid = DVec2::ZERO;
                let mut second_moment = 0.0;
                for i in 0..n {
                    let a = vertices[i];
                    let b = vertices[(i + 1) % n];
                    let cross = a.perp_dot(b);
                    area += cross / 2.0;
                    centroid += (a + b) * cross / 6.0;
                    second_moment += cross * (a.dot(a) + a.dot(b) + b.dot(b)) / 12.0;
                }
                centroid /= area;
                let mass = density * area;
                // Second moment above is about the local origin; shift it to
                // the centroid with the parallel axis theorem.
                let inertia = density * second_moment - mass * centroid.length_squared();
                MassProperties {
                    mass,
                    centroid,
                    inertia,
                }
            }
        }
    }
}
