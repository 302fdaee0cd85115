//! This module provides the small geometric vocabulary the rest of the crate
//! is written in: axis-aligned bounding boxes, rigid transforms and the
//! coefficient mixing rules used to combine two surface materials.
//!
//! All vector arithmetic is `glam::DVec2`; only what glam does not already
//! offer lives here.

use glam::{DMat2, DVec2};

/// Archimedes' constant, re-exported so callers don't need to reach into
/// `std::f64::consts` next to the other physical constants.
pub const PI: f64 = std::f64::consts::PI;

/// Gravitational constant.
pub const GRAV_CONST: f64 = 6.6743e-11;

/// Scaling applied to [`GRAV_CONST`] for attractor bodies, so attraction is
/// perceptible at world scale instead of planetary scale.
pub const GRAV_SCALE: f64 = 1e13;

/// Gravitational pulls of various celestial bodies, in m/s².
pub mod gravity {
    pub const EARTH: f64 = 9.81;
    pub const MOON: f64 = 1.62;
    pub const MARS: f64 = 3.7;
    pub const JUPITER: f64 = 24.5;
    pub const SUN: f64 = 275.0;
}

/// Rotate `v` counter-clockwise by `angle` radians.
#[inline]
pub fn rotate(v: DVec2, angle: f64) -> DVec2 {
    DMat2::from_angle(angle) * v
}

/// A position together with a rotation; the world placement of a body's
/// local frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub origin: DVec2,
    pub angle: f64,
}

impl Transform {
    pub fn new(origin: DVec2, angle: f64) -> Transform {
        Transform { origin, angle }
    }

    /// Map a point from local space into world space.
    #[inline]
    pub fn apply(&self, local: DVec2) -> DVec2 {
        self.origin + rotate(local, self.angle)
    }
}

/// Axis-aligned bounding box. Invariant: `min_x <= max_x` and
/// `min_y <= max_y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Aabb {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Aabb {
        debug_assert!(min_x <= max_x && min_y <= max_y);
        Aabb {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box containing every point of `points`.
    pub fn from_points(points: &[DVec2]) -> Aabb {
        let mut aabb = Aabb {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for p in points {
            aabb.min_x = aabb.min_x.min(p.x);
            aabb.min_y = aabb.min_y.min(p.y);
            aabb.max_x = aabb.max_x.max(p.x);
            aabb.max_y = aabb.max_y.max(p.y);
        }
        aabb
    }

    /// Component-wise half-plane checks; touching boxes count as overlapping.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    #[inline]
    pub fn contains_point(&self, p: DVec2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Smallest box containing both inputs.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// How to combine a coefficient (restitution or friction) of two materials
/// into the single value the contact solver uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CoefficientMix {
    /// `(a + b) / 2`
    Avg,
    /// `a * b`
    Mul,
    /// `sqrt(a * b)`
    #[default]
    Sqrt,
    /// `min(a, b)`
    Min,
    /// `max(a, b)`
    Max,
}

/// Mix two coefficient values.
#[inline]
pub fn mix_coefficients(a: f64, b: f64, mix: CoefficientMix) -> f64 {
    match mix {
        CoefficientMix::Avg => (a + b) / 2.0,
        CoefficientMix::Mul => a * b,
        CoefficientMix::Sqrt => (a * b).sqrt(),
        CoefficientMix::Min => a.min(b),
        CoefficientMix::Max => a.max(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    #[test]
    fn aabb_overlap_and_separation() {
        let a = Aabb::new(0.0, 0.0, 2.0, 2.0);
        let b = Aabb::new(1.0, 1.0, 3.0, 3.0);
        let c = Aabb::new(2.5, 2.5, 4.0, 4.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        // Touching edges overlap.
        let d = Aabb::new(2.0, 0.0, 3.0, 2.0);
        assert!(a.overlaps(&d));
    }

    #[test]
    fn aabb_from_points_is_tight() {
        let aabb = Aabb::from_points(&[dvec2(1.0, -2.0), dvec2(-3.0, 4.0), dvec2(0.5, 0.0)]);
        assert_eq!(aabb, Aabb::new(-3.0, -2.0, 1.0, 4.0));
    }

    #[test]
    fn coefficient_mixing_table() {
        assert_eq!(mix_coefficients(0.2, 0.8, CoefficientMix::Avg), 0.5);
        assert_eq!(mix_coefficients(0.2, 0.8, CoefficientMix::Mul), 0.16000000000000003);
        assert!((mix_coefficients(0.25, 1.0, CoefficientMix::Sqrt) - 0.5).abs() < 1e-12);
        assert_eq!(mix_coefficients(0.2, 0.8, CoefficientMix::Min), 0.2);
        assert_eq!(mix_coefficients(0.2, 0.8, CoefficientMix::Max), 0.8);
    }

    #[test]
    fn rotate_quarter_turn() {
        let v = rotate(dvec2(1.0, 0.0), PI / 2.0);
        assert!((v - dvec2(0.0, 1.0)).length() < 1e-12);
    }
}
