//! Contact points and the persistent manifolds that carry them between
//! steps, so accumulated impulses survive for warm-starting.

use glam::DVec2;

use crate::body::BodyId;
use crate::shape::ShapeId;

/// Stable identity of a contact point, derived from the geometry features
/// (edges, vertices) that produced it. Two contacts in consecutive frames
/// with equal ids are the same physical touching point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FeatureId(u32);

const TAG_CIRCLE: u32 = 0;
const TAG_EDGE: u32 = 1;
const TAG_CLIPPED: u32 = 2;

impl FeatureId {
    /// The single contact of a circle-circle manifold.
    pub const fn circle() -> FeatureId {
        FeatureId(TAG_CIRCLE << 24)
    }

    /// A circle resting on polygon edge `index`.
    pub const fn edge(index: u8) -> FeatureId {
        FeatureId(TAG_EDGE << 24 | index as u32)
    }

    /// A clipped polygon-polygon contact: reference edge, incident edge and
    /// which end of the clipped segment this point is. `flipped` records
    /// that the reference face came from shape B.
    pub const fn clipped(reference_edge: u8, incident_edge: u8, side: u8, flipped: bool) -> FeatureId {
        FeatureId(
            TAG_CLIPPED << 24
                | (flipped as u32) << 20
                | (reference_edge as u32) << 12
                | (incident_edge as u32) << 4
                | side as u32,
        )
    }

    /// Raw packed value, useful for logging.
    pub const fn key(self) -> u32 {
        self.0
    }
}

/// Solver scratch carried per contact point.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SolverScratch {
    pub normal_impulse: f64,
    pub tangent_impulse: f64,
    pub mass_normal: f64,
    pub mass_tangent: f64,
    pub velocity_bias: f64,
}

/// One touching point inside a manifold.
///
/// Anchors are stored relative to each body's center of mass in world
/// orientation, which is the frame the impulse equations want them in.
#[derive(Clone, Copy, Debug, Default)]
pub struct Contact {
    pub anchor_a: DVec2,
    pub anchor_b: DVec2,
    /// Negative when penetrating.
    pub separation: f64,
    pub id: FeatureId,
    /// Set when this contact was matched to the previous frame's contact
    /// with the same feature id.
    pub is_persisted: bool,
    pub(crate) solver: SolverScratch,
}

impl Contact {
    /// Accumulated impulse along the manifold normal. Never negative.
    pub fn normal_impulse(&self) -> f64 {
        self.solver.normal_impulse
    }

    /// Accumulated friction impulse along the tangent.
    pub fn tangent_impulse(&self) -> f64 {
        self.solver.tangent_impulse
    }
}

/// Up to two contact points between one ordered shape pair, persisted across
/// steps while the shapes' AABBs keep overlapping.
///
/// The pair is canonically ordered by shape id (`shape_a < shape_b`), so the
/// same two shapes always map to the same manifold regardless of broad-phase
/// emission order.
#[derive(Clone, Debug)]
pub struct PersistentContactPair {
    pub body_a: BodyId,
    pub body_b: BodyId,
    pub shape_a: ShapeId,
    pub shape_b: ShapeId,
    /// World-space normal pointing from shape A toward shape B.
    pub normal: DVec2,
    pub contacts: [Contact; 2],
    pub contact_count: usize,
    /// Guard so `on_contact_removed` fires exactly once per contact.
    pub(crate) remove_invoked: bool,

    // Dense body indices and mixed coefficients, refreshed every step before
    // solving; meaningless outside `Space::step`.
    pub(crate) index_a: usize,
    pub(crate) index_b: usize,
    pub(crate) friction: f64,
    pub(crate) restitution: f64,
    pub(crate) solve_enabled: bool,
}

impl PersistentContactPair {
    pub(crate) fn new(
        body_a: BodyId,
        body_b: BodyId,
        shape_a: ShapeId,
        shape_b: ShapeId,
    ) -> PersistentContactPair {
        debug_assert!(shape_a < shape_b);
        PersistentContactPair {
            body_a,
            body_b,
            shape_a,
            shape_b,
            normal: DVec2::ZERO,
            contacts: [Contact::default(); 2],
            contact_count: 0,
            remove_invoked: false,
            index_a: 0,
            index_b: 0,
            friction: 0.0,
            restitution: 0.0,
            solve_enabled: false,
        }
    }

    /// Map key: the shape ids in ascending order.
    pub fn key(&self) -> (ShapeId, ShapeId) {
        (self.shape_a, self.shape_b)
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts[..self.contact_count]
    }

    pub(crate) fn contacts_mut(&mut self) -> &mut [Contact] {
        &mut self.contacts[..self.contact_count]
    }

    /// Whether any contact point actually penetrates.
    pub fn penetrating(&self) -> bool {
        self.contacts().iter().any(|c| c.separation < 0.0)
    }
}
