//! Contact lifecycle events.
//!
//! A contact point moves through `added -> persisted (every following step)
//! -> removed`. The space reports each transition to the registered
//! listener after the narrow phase and before the solver mutates impulses;
//! `removed` fires when the pair's AABBs separate or an involved body or
//! shape leaves the space.

use glam::DVec2;

use crate::body::BodyId;
use crate::contact::FeatureId;
use crate::shape::ShapeId;

/// Snapshot of one contact point at event time.
#[derive(Clone, Copy, Debug)]
pub struct ContactEvent {
    pub body_a: BodyId,
    pub body_b: BodyId,
    pub shape_a: ShapeId,
    pub shape_b: ShapeId,
    /// World-space normal from shape A toward shape B.
    pub normal: DVec2,
    /// Positive overlap depth.
    pub penetration: f64,
    /// World-space contact position.
    pub position: DVec2,
    /// Accumulated impulses: zero in `added`, the previous step's solution
    /// in `persisted`, the final solution in `removed`.
    pub normal_impulse: f64,
    pub tangent_impulse: f64,
    pub feature_id: FeatureId,
}

/// User callbacks for contact transitions. State the C API would pass as a
/// user pointer lives on the implementing type itself.
///
/// The listener runs inside `Space::step` and only sees the event payload;
/// it cannot touch the space.
pub trait ContactListener {
    fn on_contact_added(&mut self, _event: &ContactEvent) {}
    fn on_contact_persisted(&mut self, _event: &ContactEvent) {}
    fn on_contact_removed(&mut self, _event: &ContactEvent) {}
}
