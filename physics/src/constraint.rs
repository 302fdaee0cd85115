//! User constraints, solved by the same projected Gauss-Seidel pipeline as
//! contacts: a presolve computing effective masses and bias terms, a
//! warm-start applying last substep's impulse, and an iterated incremental
//! solve.
//!
//! An equality constraint is a function C(a, b) of two body states we want
//! held at zero. Differentiating along the constraint axis `n` turns it into
//! a velocity constraint `dC/dt = v_rel . n`, which an impulse
//! `lambda = -(v_rel . n + bias) / K` drives toward the Baumgarte-corrected
//! target, with `K` the same effective mass sum the contact solver uses.
//! Inequality constraints (hinge limits) additionally project the
//! accumulated impulse onto its valid half-line.

use core::fmt;

use dyn_clone::DynClone;
use glam::{DMat2, DVec2};
use tracing::warn;

use crate::body::{BodyId, RigidBody};
use crate::space::SpaceSettings;

/// Unique constraint identity within a [`Space`](crate::space::Space).
pub type ConstraintId = u64;

/// Samples taken per spline segment when projecting the anchor onto the
/// path.
const SPLINE_SAMPLES: usize = 16;

/// Solver lifecycle of a constraint between two bodies (either side may be
/// `None`, anchoring that side to the world).
pub trait Constraint: fmt::Debug + DynClone {
    /// Bodies this constraint acts on.
    fn bodies(&self) -> (Option<BodyId>, Option<BodyId>);

    /// Resolve bodies and compute effective mass and bias. Runs once per
    /// substep, before the velocity iterations.
    fn presolve(&mut self, bodies: &mut [RigidBody], settings: &SpaceSettings, dt: f64, inv_dt: f64);

    /// Apply the impulse accumulated in the previous substep.
    fn warmstart(&mut self, bodies: &mut [RigidBody]);

    /// Apply one projected Gauss-Seidel increment.
    fn solve(&mut self, bodies: &mut [RigidBody]);
}

dyn_clone::clone_trait_object!(Constraint);

#[derive(Clone, Debug)]
pub enum ConstraintEnum {
    Distance(DistanceJoint),
    Spring(Spring),
    Hinge(HingeJoint),
    Spline(SplineJoint),
    Custom(Box<dyn Constraint>),
}

impl Constraint for ConstraintEnum {
    fn bodies(&self) -> (Option<BodyId>, Option<BodyId>) {
        match self {
            ConstraintEnum::Distance(c) => c.bodies(),
            ConstraintEnum::Spring(c) => c.bodies(),
            ConstraintEnum::Hinge(c) => c.bodies(),
            ConstraintEnum::Spline(c) => c.bodies(),
            ConstraintEnum::Custom(c) => c.bodies(),
        }
    }

    fn presolve(
        &mut self,
        bodies: &mut [RigidBody],
        settings: &SpaceSettings,
        dt: f64,
        inv_dt: f64,
    ) {
        match self {
            ConstraintEnum::Distance(c) => c.presolve(bodies, settings, dt, inv_dt),
            ConstraintEnum::Spring(c) => c.presolve(bodies, settings, dt, inv_dt),
            ConstraintEnum::Hinge(c) => c.presolve(bodies, settings, dt, inv_dt),
            ConstraintEnum::Spline(c) => c.presolve(bodies, settings, dt, inv_dt),
            ConstraintEnum::Custom(c) => c.presolve(bodies, settings, dt, inv_dt),
        }
    }

    fn warmstart(&mut self, bodies: &mut [RigidBody]) {
        match self {
            ConstraintEnum::Distance(c) => c.warmstart(bodies),
            ConstraintEnum::Spring(c) => c.warmstart(bodies),
            ConstraintEnum::Hinge(c) => c.warmstart(bodies),
            ConstraintEnum::Spline(c) => c.warmstart(bodies),
            ConstraintEnum::Custom(c) => c.warmstart(bodies),
        }
    }

    fn solve(&mut self, bodies: &mut [RigidBody]) {
        match self {
            ConstraintEnum::Distance(c) => c.solve(bodies),
            ConstraintEnum::Spring(c) => c.solve(bodies),
            ConstraintEnum::Hinge(c) => c.solve(bodies),
            ConstraintEnum::Spline(c) => c.solve(bodies),
            ConstraintEnum::Custom(c) => c.solve(bodies),
        }
    }
}

fn find_index(bodies: &[RigidBody], id: BodyId) -> Option<usize> {
    bodies.iter().position(|b| b.id == id)
}

/// A constraint with no awake dynamic body on either side has nothing to
/// solve and must not keep sleeping bodies half-awake through warm-starts.
fn any_awake_dynamic(bodies: &[RigidBody], a: &End, b: &End) -> bool {
    [a.index, b.index].into_iter().flatten().any(|i| {
        bodies[i].body_type() == crate::body::RigidBodyType::Dynamic && !bodies[i].is_sleeping()
    })
}

/// One resolved end of a constraint: a dense body index, or the world.
#[derive(Clone, Copy, Debug, Default)]
struct End {
    index: Option<usize>,
    /// World anchor point this substep.
    anchor: DVec2,
    /// Arm from the center of mass to the anchor; zero for the world.
    r: DVec2,
}

impl End {
    /// Resolve a constraint side. `local_anchor` is in the body's local
    /// frame when a body id is given, a world point otherwise. Returns
    /// `None` when the referenced body has left the space.
    fn resolve(bodies: &[RigidBody], body: Option<BodyId>, local_anchor: DVec2) -> Option<End> {
        match body {
            None => Some(End {
                index: None,
                anchor: local_anchor,
                r: DVec2::ZERO,
            }),
            Some(id) => {
                let index = find_index(bodies, id)?;
                let body = &bodies[index];
                let anchor = body.transform().apply(local_anchor);
                Some(End {
                    index: Some(index),
                    anchor,
                    r: anchor - body.position(),
                })
            }
        }
    }

    fn invmass(&self, bodies: &[RigidBody]) -> f64 {
        self.index.map_or(0.0, |i| bodies[i].invmass())
    }

    fn invinertia(&self, bodies: &[RigidBody]) -> f64 {
        self.index.map_or(0.0, |i| bodies[i].invinertia())
    }

    /// Velocity of the anchor point.
    fn velocity(&self, bodies: &[RigidBody]) -> DVec2 {
        self.index.map_or(DVec2::ZERO, |i| {
            let body = &bodies[i];
            body.linear_velocity() + self.r.perp() * body.angular_velocity()
        })
    }

    fn apply_impulse(&self, bodies: &mut [RigidBody], impulse: DVec2) {
        if let Some(i) = self.index {
            bodies[i].apply_impulse_internal(impulse, self.r);
        }
    }

    /// Effective mass contribution along `axis`.
    fn k_along(&self, bodies: &[RigidBody], axis: DVec2) -> f64 {
        let rn = self.r.perp_dot(axis);
        self.invmass(bodies) + rn * rn * self.invinertia(bodies)
    }
}

/// Hard bilateral constraint keeping two anchors at a fixed distance,
/// stabilized with Baumgarte position feedback.
#[derive(Clone, Debug)]
pub struct DistanceJoint {
    pub body_a: Option<BodyId>,
    pub body_b: Option<BodyId>,
    /// Local anchor when the side has a body, world point otherwise.
    pub anchor_a: DVec2,
    pub anchor_b: DVec2,
    pub length: f64,

    impulse: f64,
    end_a: End,
    end_b: End,
    axis: DVec2,
    mass: f64,
    bias: f64,
    active: bool,
}

impl DistanceJoint {
    pub fn new(
        body_a: Option<BodyId>,
        anchor_a: DVec2,
        body_b: Option<BodyId>,
        anchor_b: DVec2,
        length: f64,
    ) -> DistanceJoint {
        DistanceJoint {
            body_a,
            body_b,
            anchor_a,
            anchor_b,
            length,
            impulse: 0.0,
            end_a: End::default(),
            end_b: End::default(),
            axis: DVec2::ZERO,
            mass: 0.0,
            bias: 0.0,
            active: false,
        }
    }
}

impl Constraint for DistanceJoint {
    fn bodies(&self) -> (Option<BodyId>, Option<BodyId>) {
        (self.body_a, self.body_b)
    }

    fn presolve(
        &mut self,
        bodies: &mut [RigidBody],
        settings: &SpaceSettings,
        _dt: f64,
        inv_dt: f64,
    ) {
        self.active = false;
        let (Some(end_a), Some(end_b)) = (
            End::resolve(bodies, self.body_a, self.anchor_a),
            End::resolve(bodies, self.body_b, self.anchor_b),
        ) else {
            return;
        };

        if !any_awake_dynamic(bodies, &end_a, &end_b) {
            return;
        }

        let delta = end_b.anchor - end_a.anchor;
        let Some(axis) = delta.try_normalize() else {
            warn!("distance joint anchors coincide, skipping");
            return;
        };

        let k = end_a.k_along(bodies, axis) + end_b.k_along(bodies, axis);
        if k <= 0.0 {
            return;
        }

        self.end_a = end_a;
        self.end_b = end_b;
        self.axis = axis;
        self.mass = 1.0 / k;
        self.bias = settings.baumgarte * inv_dt * (delta.length() - self.length);
        self.active = true;
    }

    fn warmstart(&mut self, bodies: &mut [RigidBody]) {
        if !self.active {
            return;
        }
        let impulse = self.axis * self.impulse;
        self.end_a.apply_impulse(bodies, -impulse);
        self.end_b.apply_impulse(bodies, impulse);
    }

    fn solve(&mut self, bodies: &mut [RigidBody]) {
        if !self.active {
            return;
        }
        let vn = (self.end_b.velocity(bodies) - self.end_a.velocity(bodies)).dot(self.axis);
        let lambda = -(vn + self.bias) * self.mass;
        self.impulse += lambda;

        let impulse = self.axis * lambda;
        self.end_a.apply_impulse(bodies, -impulse);
        self.end_b.apply_impulse(bodies, impulse);
    }
}

/// Damped spring between two anchors, formulated as a soft constraint:
/// `gamma = 1 / (dt (stiffness dt + damping))` augments the effective mass
/// and feeds the stretch back through the bias, which keeps stiff springs
/// stable at plain PGS iteration counts.
#[derive(Clone, Debug)]
pub struct Spring {
    pub body_a: Option<BodyId>,
    pub body_b: Option<BodyId>,
    pub anchor_a: DVec2,
    pub anchor_b: DVec2,
    pub rest_length: f64,
    pub stiffness: f64,
    pub damping: f64,

    impulse: f64,
    end_a: End,
    end_b: End,
    axis: DVec2,
    mass: f64,
    bias: f64,
    gamma: f64,
    active: bool,
}

impl Spring {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        body_a: Option<BodyId>,
        anchor_a: DVec2,
        body_b: Option<BodyId>,
        anchor_b: DVec2,
        rest_length: f64,
        stiffness: f64,
        damping: f64,
    ) -> Spring {
        Spring {
            body_a,
            body_b,
            anchor_a,
            anchor_b,
            rest_length,
            stiffness,
            damping,
            impulse: 0.0,
            end_a: End::default(),
            end_b: End::default(),
            axis: DVec2::ZERO,
            mass: 0.0,
            bias: 0.0,
            gamma: 0.0,
            active: false,
        }
    }
}

impl Constraint for Spring {
    fn bodies(&self) -> (Option<BodyId>, Option<BodyId>) {
        (self.body_a, self.body_b)
    }

    fn presolve(
        &mut self,
        bodies: &mut [RigidBody],
        _settings: &SpaceSettings,
        dt: f64,
        _inv_dt: f64,
    ) {
        self.active = false;
        self.impulse = 0.0;
        let (Some(end_a), Some(end_b)) = (
            End::resolve(bodies, self.body_a, self.anchor_a),
            End::resolve(bodies, self.body_b, self.anchor_b),
        ) else {
            return;
        };

        if !any_awake_dynamic(bodies, &end_a, &end_b) {
            return;
        }

        let delta = end_b.anchor - end_a.anchor;
        let Some(axis) = delta.try_normalize() else {
            return;
        };

        let k = end_a.k_along(bodies, axis) + end_b.k_along(bodies, axis);
        let gamma_denom = dt * (self.stiffness * dt + self.damping);
        let gamma = if gamma_denom > 0.0 { 1.0 / gamma_denom } else { 0.0 };
        if k + gamma <= 0.0 {
            return;
        }

        let stretch = delta.length() - self.rest_length;
        self.end_a = end_a;
        self.end_b = end_b;
        self.axis = axis;
        self.gamma = gamma;
        self.mass = 1.0 / (k + gamma);
        self.bias = stretch * dt * self.stiffness * gamma;
        self.active = true;
    }

    fn warmstart(&mut self, bodies: &mut [RigidBody]) {
        if !self.active {
            return;
        }
        let impulse = self.axis * self.impulse;
        self.end_a.apply_impulse(bodies, -impulse);
        self.end_b.apply_impulse(bodies, impulse);
    }

    fn solve(&mut self, bodies: &mut [RigidBody]) {
        if !self.active {
            return;
        }
        let vn = (self.end_b.velocity(bodies) - self.end_a.velocity(bodies)).dot(self.axis);
        let lambda = -(vn + self.bias + self.gamma * self.impulse) * self.mass;
        self.impulse += lambda;

        let impulse = self.axis * lambda;
        self.end_a.apply_impulse(bodies, -impulse);
        self.end_b.apply_impulse(bodies, impulse);
    }
}

/// Revolute joint: pins a world point of both bodies together and optionally
/// limits their relative rotation to `[lower_limit, upper_limit]` radians.
#[derive(Clone, Debug)]
pub struct HingeJoint {
    pub body_a: Option<BodyId>,
    pub body_b: Option<BodyId>,
    /// Pivot, in world coordinates at creation time.
    pub anchor: DVec2,
    pub enable_limits: bool,
    pub lower_limit: f64,
    pub upper_limit: f64,

    // Local anchors and the rest angle, captured on the first presolve.
    initialized: bool,
    local_anchor_a: DVec2,
    local_anchor_b: DVec2,
    reference_angle: f64,

    point_impulse: DVec2,
    lower_impulse: f64,
    upper_impulse: f64,

    end_a: End,
    end_b: End,
    point_mass: DMat2,
    point_bias: DVec2,
    axial_mass: f64,
    lower_bias: f64,
    upper_bias: f64,
    active: bool,
}

impl HingeJoint {
    pub fn new(body_a: Option<BodyId>, body_b: Option<BodyId>, anchor: DVec2) -> HingeJoint {
        HingeJoint {
            body_a,
            body_b,
            anchor,
            enable_limits: false,
            lower_limit: 0.0,
            upper_limit: 0.0,
            initialized: false,
            local_anchor_a: DVec2::ZERO,
            local_anchor_b: DVec2::ZERO,
            reference_angle: 0.0,
            point_impulse: DVec2::ZERO,
            lower_impulse: 0.0,
            upper_impulse: 0.0,
            end_a: End::default(),
            end_b: End::default(),
            point_mass: DMat2::ZERO,
            point_bias: DVec2::ZERO,
            axial_mass: 0.0,
            lower_bias: 0.0,
            upper_bias: 0.0,
            active: false,
        }
    }

    pub fn with_limits(mut self, lower: f64, upper: f64) -> HingeJoint {
        self.enable_limits = true;
        self.lower_limit = lower;
        self.upper_limit = upper;
        self
    }

    fn angle_of(&self, bodies: &[RigidBody], body: Option<BodyId>) -> f64 {
        body.and_then(|id| find_index(bodies, id))
            .map_or(0.0, |i| bodies[i].angle())
    }

    fn relative_angle(&self, bodies: &[RigidBody]) -> f64 {
        self.angle_of(bodies, self.body_b) - self.angle_of(bodies, self.body_a)
            - self.reference_angle
    }
}

impl Constraint for HingeJoint {
    fn bodies(&self) -> (Option<BodyId>, Option<BodyId>) {
        (self.body_a, self.body_b)
    }

    fn presolve(
        &mut self,
        bodies: &mut [RigidBody],
        settings: &SpaceSettings,
        _dt: f64,
        inv_dt: f64,
    ) {
        self.active = false;

        if !self.initialized {
            // Express the pivot in each body's local frame so the joint
            // follows the bodies from here on.
            let to_local = |body: Option<BodyId>| -> Option<DVec2> {
                match body {
                    None => Some(self.anchor),
                    Some(id) => {
                        let body = &bodies[find_index(bodies, id)?];
                        Some(crate::math::rotate(
                            self.anchor - body.origin(),
                            -body.angle(),
                        ))
                    }
                }
            };
            let (Some(a), Some(b)) = (to_local(self.body_a), to_local(self.body_b)) else {
                return;
            };
            self.local_anchor_a = a;
            self.local_anchor_b = b;
            self.reference_angle =
                self.angle_of(bodies, self.body_b) - self.angle_of(bodies, self.body_a);
            self.initialized = true;
        }

        let (Some(end_a), Some(end_b)) = (
            End::resolve(bodies, self.body_a, self.local_anchor_a),
            End::resolve(bodies, self.body_b, self.local_anchor_b),
        ) else {
            return;
        };

        if !any_awake_dynamic(bodies, &end_a, &end_b) {
            return;
        }

        let (im_a, ii_a) = (end_a.invmass(bodies), end_a.invinertia(bodies));
        let (im_b, ii_b) = (end_b.invmass(bodies), end_b.invinertia(bodies));
        let (r_a, r_b) = (end_a.r, end_b.r);

        // 2x2 effective mass of the point-to-point constraint.
        let k = DMat2::from_cols(
            DVec2::new(
                im_a + im_b + ii_a * r_a.y * r_a.y + ii_b * r_b.y * r_b.y,
                -ii_a * r_a.x * r_a.y - ii_b * r_b.x * r_b.y,
            ),
            DVec2::new(
                -ii_a * r_a.x * r_a.y - ii_b * r_b.x * r_b.y,
                im_a + im_b + ii_a * r_a.x * r_a.x + ii_b * r_b.x * r_b.x,
            ),
        );
        if k.determinant().abs() <= f64::EPSILON {
            warn!("hinge joint has a singular mass matrix, skipping");
            return;
        }

        self.point_mass = k.inverse();
        self.point_bias = (end_b.anchor - end_a.anchor) * (settings.baumgarte * inv_dt);

        let axial_k = ii_a + ii_b;
        self.axial_mass = if axial_k > 0.0 { 1.0 / axial_k } else { 0.0 };
        if self.enable_limits {
            // Speculative bound: while inside the limit the constraint may
            // approach it at up to C/dt, so free swings stay untouched;
            // once violated, Baumgarte pushes back.
            let angle = self.relative_angle(bodies);
            let c = angle - self.lower_limit;
            self.lower_bias = c.max(0.0) * inv_dt + c.min(0.0) * settings.baumgarte * inv_dt;
            let c = self.upper_limit - angle;
            self.upper_bias = c.max(0.0) * inv_dt + c.min(0.0) * settings.baumgarte * inv_dt;
        }

        self.end_a = end_a;
        self.end_b = end_b;
        self.active = true;
    }

    fn warmstart(&mut self, bodies: &mut [RigidBody]) {
        if !self.active {
            return;
        }
        self.end_a.apply_impulse(bodies, -self.point_impulse);
        self.end_b.apply_impulse(bodies, self.point_impulse);

        let axial = self.lower_impulse - self.upper_impulse;
        apply_torque_impulse(bodies, self.end_a.index, self.end_b.index, axial);
    }

    fn solve(&mut self, bodies: &mut [RigidBody]) {
        if !self.active {
            return;
        }

        // Angular limits first so the point constraint sees their result.
        if self.enable_limits && self.axial_mass > 0.0 {
            let w_a = self
                .end_a
                .index
                .map_or(0.0, |i| bodies[i].angular_velocity());
            let w_b = self
                .end_b
                .index
                .map_or(0.0, |i| bodies[i].angular_velocity());

            // Lower limit: keep relative angle above `lower_limit`.
            let lambda = -self.axial_mass * (w_b - w_a + self.lower_bias);
            let total = (self.lower_impulse + lambda).max(0.0);
            let delta = total - self.lower_impulse;
            self.lower_impulse = total;
            apply_torque_impulse(bodies, self.end_a.index, self.end_b.index, delta);

            // Upper limit, mirrored.
            let w_a = self
                .end_a
                .index
                .map_or(0.0, |i| bodies[i].angular_velocity());
            let w_b = self
                .end_b
                .index
                .map_or(0.0, |i| bodies[i].angular_velocity());
            let lambda = -self.axial_mass * (w_a - w_b + self.upper_bias);
            let total = (self.upper_impulse + lambda).max(0.0);
            let delta = total - self.upper_impulse;
            self.upper_impulse = total;
            apply_torque_impulse(bodies, self.end_a.index, self.end_b.index, -delta);
        }

        let v_rel = self.end_b.velocity(bodies) - self.end_a.velocity(bodies);
        let lambda = -(self.point_mass * (v_rel + self.point_bias));
        self.point_impulse += lambda;

        self.end_a.apply_impulse(bodies, -lambda);
        self.end_b.apply_impulse(bodies, lambda);
    }
}

fn apply_torque_impulse(
    bodies: &mut [RigidBody],
    index_a: Option<usize>,
    index_b: Option<usize>,
    impulse: f64,
) {
    if impulse == 0.0 {
        return;
    }
    if let Some(i) = index_a {
        bodies[i].apply_angular_impulse_internal(-impulse);
    }
    if let Some(i) = index_b {
        bodies[i].apply_angular_impulse_internal(impulse);
    }
}

/// Keeps a body anchor on a Catmull-Rom path through the control points.
/// Each presolve projects the anchor onto the sampled curve and the solver
/// pulls it toward the closest point.
#[derive(Clone, Debug)]
pub struct SplineJoint {
    pub body: BodyId,
    pub anchor: DVec2,
    control_points: Vec<DVec2>,

    impulse: f64,
    end: End,
    axis: DVec2,
    mass: f64,
    bias: f64,
    active: bool,
}

impl SplineJoint {
    pub fn new(body: BodyId, anchor: DVec2, control_points: Vec<DVec2>) -> SplineJoint {
        SplineJoint {
            body,
            anchor,
            control_points,
            impulse: 0.0,
            end: End::default(),
            axis: DVec2::ZERO,
            mass: 0.0,
            bias: 0.0,
            active: false,
        }
    }

    pub fn control_points(&self) -> &[DVec2] {
        &self.control_points
    }

    /// Closest sampled point of the path to `point`.
    fn project(&self, point: DVec2) -> Option<DVec2> {
        let points = &self.control_points;
        if points.len() < 2 {
            return None;
        }
        let at = |i: isize| points[i.clamp(0, points.len() as isize - 1) as usize];

        let mut best = points[0];
        let mut best_distance = f64::INFINITY;
        for segment in 0..points.len() - 1 {
            let s = segment as isize;
            let (p0, p1, p2, p3) = (at(s - 1), at(s), at(s + 1), at(s + 2));
            for step in 0..=SPLINE_SAMPLES {
                let t = step as f64 / SPLINE_SAMPLES as f64;
                let sample = catmull_rom(p0, p1, p2, p3, t);
                let distance = sample.distance_squared(point);
                if distance < best_distance {
                    best_distance = distance;
                    best = sample;
                }
            }
        }
        Some(best)
    }
}

fn catmull_rom(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, t: f64) -> DVec2 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

impl Constraint for SplineJoint {
    fn bodies(&self) -> (Option<BodyId>, Option<BodyId>) {
        (Some(self.body), None)
    }

    fn presolve(
        &mut self,
        bodies: &mut [RigidBody],
        settings: &SpaceSettings,
        _dt: f64,
        inv_dt: f64,
    ) {
        self.active = false;
        let Some(end) = End::resolve(bodies, Some(self.body), self.anchor) else {
            return;
        };
        if !any_awake_dynamic(bodies, &end, &End::default()) {
            return;
        }
        let Some(target) = self.project(end.anchor) else {
            warn!("spline joint needs at least two control points");
            return;
        };

        let offset = end.anchor - target;
        let Some(axis) = offset.try_normalize() else {
            // Already on the path; nothing to correct this substep.
            return;
        };

        let k = end.k_along(bodies, axis);
        if k <= 0.0 {
            return;
        }

        self.end = end;
        self.axis = axis;
        self.mass = 1.0 / k;
        self.bias = settings.baumgarte * inv_dt * offset.length();
        self.active = true;
    }

    fn warmstart(&mut self, bodies: &mut [RigidBody]) {
        if !self.active {
            return;
        }
        self.end.apply_impulse(bodies, self.axis * self.impulse);
    }

    fn solve(&mut self, bodies: &mut [RigidBody]) {
        if !self.active {
            return;
        }
        let vn = self.end.velocity(bodies).dot(self.axis);
        let lambda = -(vn + self.bias) * self.mass;
        self.impulse += lambda;
        self.end.apply_impulse(bodies, self.axis * lambda);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    #[test]
    fn catmull_rom_interpolates_control_points() {
        let p0 = dvec2(0.0, 0.0);
        let p1 = dvec2(1.0, 1.0);
        let p2 = dvec2(2.0, 0.0);
        let p3 = dvec2(3.0, 1.0);
        assert!((catmull_rom(p0, p1, p2, p3, 0.0) - p1).length() < 1e-12);
        assert!((catmull_rom(p0, p1, p2, p3, 1.0) - p2).length() < 1e-12);
    }

    #[test]
    fn spline_projection_picks_nearest_point() {
        let joint = SplineJoint::new(
            1,
            DVec2::ZERO,
            vec![dvec2(0.0, 0.0), dvec2(10.0, 0.0)],
        );
        let projected = joint.project(dvec2(5.0, 3.0)).unwrap();
        assert!((projected - dvec2(5.0, 0.0)).length() < 0.6);
    }
}
