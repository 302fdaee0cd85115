//! The space owns every body, constraint and persistent manifold and runs
//! the per-step pipeline:
//!
//! 1. Integrate accelerations (forces, gravity, damping)
//! 2. Broad phase: candidate shape pairs, stale manifold removal
//! 3. Narrow phase: refresh manifolds, match features, fire contact events
//! 4. Constraints: presolve, warm-start, velocity iterations
//! 5. Contacts: presolve, warm-start, velocity iterations
//! 6. Integrate velocities
//! 7. Optional NGS position iterations
//!
//! A space is single-threaded: `step` runs start to finish without yielding
//! and the type is not safe for concurrent mutation.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use glam::DVec2;
use tracing::{instrument, trace_span};

use crate::body::{body_pair_mut, BodyId, RigidBody, RigidBodyType};
use crate::broadphase::{self, BroadphaseAlgorithm};
use crate::collision;
use crate::constraint::{Constraint, ConstraintEnum, ConstraintId};
use crate::contact::{Contact, PersistentContactPair};
use crate::error::PhysicsError;
use crate::events::{ContactEvent, ContactListener};
use crate::math::{gravity, Aabb, CoefficientMix, GRAV_CONST, GRAV_SCALE};
use crate::profiler::{Profiler, StageTimer};
use crate::shape::ShapeId;
use crate::solver;

/// How contact penetration errors are corrected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContactPositionCorrection {
    /// Fold the position error into the velocity bias (cheap, slightly
    /// springy).
    #[default]
    Baumgarte,
    /// Separate non-linear Gauss-Seidel position iterations after
    /// integration (stiffer stacks, costs extra narrow-phase work).
    Ngs,
}

/// Simulation tuning knobs; the defaults suit a 60 Hz game step.
#[derive(Clone, Copy, Debug)]
pub struct SpaceSettings {
    /// Position-error feedback gain of the iterative solver.
    pub baumgarte: f64,
    /// Overlap allowed before position correction kicks in.
    pub penetration_slop: f64,
    pub contact_position_correction: ContactPositionCorrection,
    /// PGS iterations for velocity constraints; 6-10 suffices for games.
    pub velocity_iterations: u32,
    /// NGS iterations for contact position correction only.
    pub position_iterations: u32,
    /// How many times the full pipeline runs per `step` call. Raises
    /// accuracy and cost alike; best left at 1 for games.
    pub substeps: u32,
    /// Velocity damping removing energy injected by numerical drift. The
    /// factor applied per substep is `0.99 ^ (damping * body_scale * dt)`.
    pub linear_damping: f64,
    pub angular_damping: f64,
    /// Start each solve from the previous frame's impulses. Large
    /// stability win for Gauss-Seidel solvers at almost no cost; there is
    /// no good reason to turn it off outside of debugging.
    pub warmstarting: bool,
    pub restitution_mix: CoefficientMix,
    pub friction_mix: CoefficientMix,
    /// Let resting bodies fall asleep and drop out of solving.
    pub sleeping: bool,
    /// Squared-velocity motion (`|v|^2 + w^2`) a colliding body must exceed
    /// to wake a sleeping one.
    pub wake_energy_threshold: f64,
    /// Motion below which a body accumulates sleep frames.
    pub sleep_energy_threshold: f64,
    /// Consecutive substeps below the threshold before a body sleeps.
    pub sleep_frames: u32,
}

impl Default for SpaceSettings {
    fn default() -> Self {
        SpaceSettings {
            baumgarte: 0.2,
            penetration_slop: 0.05,
            contact_position_correction: ContactPositionCorrection::Baumgarte,
            velocity_iterations: 8,
            position_iterations: 4,
            substeps: 1,
            linear_damping: 0.0005,
            angular_damping: 0.0005,
            warmstarting: true,
            restitution_mix: CoefficientMix::Sqrt,
            friction_mix: CoefficientMix::Sqrt,
            sleeping: false,
            wake_energy_threshold: 0.4,
            sleep_energy_threshold: 0.02,
            sleep_frames: 60,
        }
    }
}

enum EventKind {
    Added,
    Persisted,
    Removed,
}

/// The core of the simulation: manages and steps all bodies, constraints
/// and collisions.
pub struct Space {
    bodies: Vec<RigidBody>,
    constraints: Vec<(ConstraintId, ConstraintEnum)>,
    contacts: BTreeMap<(ShapeId, ShapeId), PersistentContactPair>,
    pairs: Vec<broadphase::ShapePair>,
    pending_events: Vec<(EventKind, ContactEvent)>,

    pub settings: SpaceSettings,
    gravity: DVec2,
    broadphase_algorithm: BroadphaseAlgorithm,
    listener: Option<Box<dyn ContactListener>>,

    /// Dynamic bodies leaving these bounds are removed at the end of the
    /// step.
    pub kill_bounds: Aabb,
    pub use_kill_bounds: bool,

    pub profiler: Profiler,
    body_id_counter: u64,
    constraint_id_counter: u64,
}

impl Default for Space {
    fn default() -> Self {
        Space::new()
    }
}

impl Space {
    pub fn new() -> Space {
        Space {
            bodies: Vec::new(),
            constraints: Vec::new(),
            contacts: BTreeMap::new(),
            pairs: Vec::new(),
            pending_events: Vec::new(),
            settings: SpaceSettings::default(),
            gravity: DVec2::new(0.0, gravity::EARTH),
            broadphase_algorithm: BroadphaseAlgorithm::default(),
            listener: None,
            kill_bounds: Aabb::new(-1e4, -1e4, 1e4, 1e4),
            use_kill_bounds: true,
            profiler: Profiler::default(),
            body_id_counter: 1,
            constraint_id_counter: 1,
        }
    }

    pub fn gravity(&self) -> DVec2 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: DVec2) {
        self.gravity = gravity;
    }

    pub fn broadphase(&self) -> BroadphaseAlgorithm {
        self.broadphase_algorithm
    }

    pub fn set_broadphase(&mut self, algorithm: BroadphaseAlgorithm) {
        self.broadphase_algorithm = algorithm;
    }

    pub fn set_contact_listener(&mut self, listener: Box<dyn ContactListener>) {
        self.listener = Some(listener);
    }

    pub fn take_contact_listener(&mut self) -> Option<Box<dyn ContactListener>> {
        self.listener.take()
    }

    /// Hand a body to the space. The space owns it from here on and assigns
    /// its id; ids grow monotonically, so the body array stays sorted by id.
    pub fn add_body(&mut self, mut body: RigidBody) -> BodyId {
        let id = self.body_id_counter;
        self.body_id_counter += 1;
        body.id = id;
        self.bodies.push(body);
        id
    }

    /// Detach a body and hand it back. Manifolds it participates in fire
    /// their `removed` events and constraints referencing it are dropped.
    pub fn remove_body(&mut self, id: BodyId) -> Result<RigidBody, PhysicsError> {
        let index = self
            .index_of(id)
            .ok_or(PhysicsError::UnknownBody(id))?;

        let stale: Vec<_> = self
            .contacts
            .values()
            .filter(|pcp| pcp.body_a == id || pcp.body_b == id)
            .map(|pcp| pcp.key())
            .collect();
        for key in stale {
            if let Some(pcp) = self.contacts.remove(&key) {
                self.queue_removed_events(pcp);
            }
        }
        self.dispatch_events();

        self.constraints.retain(|(_, constraint)| {
            let (a, b) = constraint.bodies();
            a != Some(id) && b != Some(id)
        });

        let mut body = self.bodies.remove(index);
        body.id = 0;
        Ok(body)
    }

    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        let index = self.index_of(id)?;
        Some(&mut self.bodies[index])
    }

    /// All bodies in insertion (= id) order.
    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    /// Hand a constraint to the space. Fails when it references no body at
    /// all or a body the space does not know.
    pub fn add_constraint(
        &mut self,
        constraint: ConstraintEnum,
    ) -> Result<ConstraintId, PhysicsError> {
        let (a, b) = constraint.bodies();
        if a.is_none() && b.is_none() {
            return Err(PhysicsError::ConstraintWithoutBodies);
        }
        for id in [a, b].into_iter().flatten() {
            if self.index_of(id).is_none() {
                return Err(PhysicsError::UnknownBody(id));
            }
        }
        let id = self.constraint_id_counter;
        self.constraint_id_counter += 1;
        self.constraints.push((id, constraint));
        Ok(id)
    }

    /// Detach a constraint and hand it back.
    pub fn remove_constraint(&mut self, id: ConstraintId) -> Result<ConstraintEnum, PhysicsError> {
        let index = self
            .constraints
            .iter()
            .position(|(cid, _)| *cid == id)
            .ok_or(PhysicsError::UnknownConstraint(id))?;
        Ok(self.constraints.remove(index).1)
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&ConstraintEnum> {
        self.constraints
            .iter()
            .find(|(cid, _)| *cid == id)
            .map(|(_, c)| c)
    }

    pub fn constraint_mut(&mut self, id: ConstraintId) -> Option<&mut ConstraintEnum> {
        self.constraints
            .iter_mut()
            .find(|(cid, _)| *cid == id)
            .map(|(_, c)| c)
    }

    /// Live manifolds, ordered by shape-id pair.
    pub fn contacts(&self) -> impl Iterator<Item = &PersistentContactPair> {
        self.contacts.values()
    }

    /// Drop every body, constraint, manifold and queued pair. Contact
    /// listeners are kept but see no `removed` events for the dropped
    /// manifolds.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.constraints.clear();
        self.contacts.clear();
        self.pairs.clear();
        self.pending_events.clear();
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|b| b.id == id)
    }

    /// Advance the simulation by `dt` seconds.
    #[instrument(level = "trace", skip_all, fields(dt))]
    pub fn step(&mut self, dt: f64) {
        if dt == 0.0 || self.settings.substeps == 0 {
            return;
        }
        self.profiler.reset();
        let step_timer = StageTimer::start();

        let substeps = self.settings.substeps;
        let h = dt / substeps as f64;
        let inv_h = 1.0 / h;
        let velocity_iterations = self.settings.velocity_iterations;

        for _ in 0..substeps {
            self.apply_attraction();

            // Integrate accelerations; doing it first also resets the
            // per-step transform and AABB caches.
            let timer = StageTimer::start();
            for body in &mut self.bodies {
                if body.body_type() != RigidBodyType::Static {
                    body.invalidate_caches();
                }
                body.integrate_accelerations(
                    self.gravity,
                    self.settings.linear_damping,
                    self.settings.angular_damping,
                    h,
                );
            }
            timer.stop(&mut self.profiler.integrate_accelerations);

            // Broad phase: rebuild the pair arena, then drop manifolds whose
            // pair did not come back.
            let timer = StageTimer::start();
            self.pairs.clear();
            match self.broadphase_algorithm {
                BroadphaseAlgorithm::BruteForce => broadphase::brute_force(
                    &mut self.bodies,
                    self.settings.sleeping,
                    &mut self.pairs,
                ),
                BroadphaseAlgorithm::SpatialHashGrid { cell_size } => {
                    broadphase::spatial_hash_grid(
                        &mut self.bodies,
                        self.settings.sleeping,
                        cell_size,
                        &mut self.pairs,
                    )
                }
            }
            self.sweep_stale_manifolds();
            timer.stop(&mut self.profiler.broadphase);

            // Narrow phase; lifecycle events fire before any impulse is
            // touched.
            let timer = StageTimer::start();
            self.narrow_phase();
            timer.stop(&mut self.profiler.narrowphase);
            self.dispatch_events();

            // Constraints run before contacts: positional joints shape the
            // velocities the contact solver then corrects.
            let timer = StageTimer::start();
            for (_, constraint) in &mut self.constraints {
                constraint.presolve(&mut self.bodies, &self.settings, h, inv_h);
            }
            for (_, constraint) in &mut self.constraints {
                constraint.warmstart(&mut self.bodies);
            }
            timer.stop(&mut self.profiler.presolve_constraints);

            let timer = StageTimer::start();
            for iteration in 0..velocity_iterations {
                let span = trace_span!("constraint_iteration", iteration);
                let _enter = span.enter();
                for (_, constraint) in &mut self.constraints {
                    constraint.solve(&mut self.bodies);
                }
            }
            timer.stop(&mut self.profiler.solve_constraints);

            let timer = StageTimer::start();
            for pcp in self.contacts.values_mut() {
                solver::presolve(pcp, &mut self.bodies, &self.settings, inv_h);
            }
            for pcp in self.contacts.values_mut() {
                solver::warmstart(pcp, &mut self.bodies, &self.settings);
            }
            timer.stop(&mut self.profiler.presolve_contacts);

            let timer = StageTimer::start();
            for iteration in 0..velocity_iterations {
                let span = trace_span!("contact_iteration", iteration);
                let _enter = span.enter();
                for pcp in self.contacts.values_mut() {
                    solver::solve_velocity(pcp, &mut self.bodies);
                }
            }
            timer.stop(&mut self.profiler.solve_velocities);

            let timer = StageTimer::start();
            for body in &mut self.bodies {
                body.integrate_velocities(h);
            }
            timer.stop(&mut self.profiler.integrate_velocities);

            if self.settings.contact_position_correction == ContactPositionCorrection::Ngs {
                let timer = StageTimer::start();
                for _ in 0..self.settings.position_iterations {
                    for pcp in self.contacts.values_mut() {
                        solver::solve_position(pcp, &mut self.bodies, &self.settings);
                    }
                }
                timer.stop(&mut self.profiler.solve_positions);
            }

            if self.settings.sleeping {
                self.update_sleep();
            }
        }

        if self.use_kill_bounds {
            self.enforce_kill_bounds();
        }

        step_timer.stop(&mut self.profiler.step);
    }

    /// Gameplay-scaled n-body attraction: every attractor pulls every other
    /// awake dynamic body toward itself.
    fn apply_attraction(&mut self) {
        let attractors: Vec<(DVec2, f64)> = self
            .bodies
            .iter()
            .filter(|b| b.is_attractor())
            .map(|b| (b.position(), b.mass()))
            .collect();
        if attractors.is_empty() {
            return;
        }

        for body in &mut self.bodies {
            if body.body_type() != RigidBodyType::Dynamic || body.is_sleeping() {
                continue;
            }
            for &(position, mass) in &attractors {
                let delta = position - body.position();
                let distance_squared = delta.length_squared();
                if distance_squared < 1e-12 {
                    continue;
                }
                let strength = GRAV_CONST * GRAV_SCALE * mass * body.mass() / distance_squared;
                body.apply_force(delta.normalize() * strength);
            }
        }
    }

    /// A manifold lives exactly as long as its shape pair keeps coming out
    /// of the broad phase. Pairs suppressed only by the sleeping early-out
    /// keep theirs while the bodies still overlap, so waking up does not
    /// replay `added` events.
    fn sweep_stale_manifolds(&mut self) {
        let live: BTreeSet<(ShapeId, ShapeId)> =
            self.pairs.iter().map(|p| (p.shape_a, p.shape_b)).collect();

        let mut removed = Vec::new();
        let bodies = &self.bodies;
        let sleeping_enabled = self.settings.sleeping;
        self.contacts.retain(|key, pcp| {
            if live.contains(key) {
                return true;
            }
            if sleeping_enabled {
                let index_a = bodies.iter().position(|b| b.id == pcp.body_a);
                let index_b = bodies.iter().position(|b| b.id == pcp.body_b);
                if let (Some(index_a), Some(index_b)) = (index_a, index_b) {
                    let (a, b) = (&bodies[index_a], &bodies[index_b]);
                    let skipped_for_sleep = (a.sleeping && b.sleeping)
                        || (a.sleeping && b.body_type() == RigidBodyType::Static)
                        || (b.sleeping && a.body_type() == RigidBodyType::Static);
                    if skipped_for_sleep {
                        if let (Some(box_a), Some(box_b)) = (a.cached_aabb(), b.cached_aabb()) {
                            if box_a.overlaps(&box_b) {
                                // Other removals may have shifted the dense
                                // indices the solver will use.
                                pcp.index_a = index_a;
                                pcp.index_b = index_b;
                                return true;
                            }
                        }
                    }
                }
            }
            removed.push(pcp.clone());
            false
        });

        for pcp in removed {
            self.queue_removed_events(pcp);
        }
    }

    /// Recompute every candidate pair's manifold from current transforms,
    /// match contacts to last frame's by feature id and queue the lifecycle
    /// events.
    fn narrow_phase(&mut self) {
        let warmstarting = self.settings.warmstarting;
        let sleeping_enabled = self.settings.sleeping;

        for pair_index in 0..self.pairs.len() {
            let pair = self.pairs[pair_index];
            let (a, b) = body_pair_mut(&mut self.bodies, pair.index_a, pair.index_b);
            let (id_a, id_b) = (a.id, b.id);
            let (transform_a, transform_b) = (a.transform(), b.transform());
            let (position_a, position_b) = (a.position(), b.position());

            let result = collision::collide(
                &mut a.shapes_mut()[pair.shape_index_a],
                transform_a,
                &mut b.shapes_mut()[pair.shape_index_b],
                transform_b,
            );

            let mut pcp = PersistentContactPair::new(id_a, id_b, pair.shape_a, pair.shape_b);
            pcp.index_a = pair.index_a;
            pcp.index_b = pair.index_b;
            pcp.normal = result.normal;
            for point in result.points() {
                // Anchors relative to each center of mass, world oriented.
                pcp.contacts[pcp.contact_count] = Contact {
                    anchor_a: point.position - position_a,
                    anchor_b: point.position - position_b,
                    separation: point.separation,
                    id: point.feature,
                    is_persisted: false,
                    solver: Default::default(),
                };
                pcp.contact_count += 1;
            }

            if sleeping_enabled && pcp.penetrating() {
                self.wake_on_contact(pair.index_a, pair.index_b);
            }

            let key = (pair.shape_a, pair.shape_b);
            let stored = match self.contacts.entry(key) {
                Entry::Occupied(mut entry) => {
                    let old = entry.get_mut();
                    for contact in pcp.contacts_mut() {
                        if let Some(previous) =
                            old.contacts().iter().find(|c| c.id == contact.id)
                        {
                            contact.is_persisted = true;
                            if warmstarting {
                                contact.solver.normal_impulse = previous.solver.normal_impulse;
                                contact.solver.tangent_impulse = previous.solver.tangent_impulse;
                            }
                        }
                    }
                    // Replace even when empty: the pair still overlaps in
                    // AABB, and the manifold carries the removal guard.
                    *old = pcp;
                    true
                }
                Entry::Vacant(entry) => {
                    if pcp.penetrating() {
                        entry.insert(pcp);
                        true
                    } else {
                        false
                    }
                }
            };
            if stored {
                self.queue_contact_events(&key);
            }
        }
    }

    /// A sleeping body wakes when something sufficiently energetic touches
    /// it.
    fn wake_on_contact(&mut self, index_a: usize, index_b: usize) {
        let motion = |body: &RigidBody| {
            body.linear_velocity().length_squared()
                + body.angular_velocity() * body.angular_velocity()
        };
        let threshold = self.settings.wake_energy_threshold;

        let (a, b) = body_pair_mut(&mut self.bodies, index_a, index_b);
        if a.sleeping && !b.sleeping && b.body_type() == RigidBodyType::Dynamic && motion(b) > threshold
        {
            a.wake();
        }
        if b.sleeping && !a.sleeping && a.body_type() == RigidBodyType::Dynamic && motion(a) > threshold
        {
            b.wake();
        }
    }

    fn update_sleep(&mut self) {
        let threshold = self.settings.sleep_energy_threshold;
        let frames = self.settings.sleep_frames;
        for body in &mut self.bodies {
            if body.body_type() != RigidBodyType::Dynamic || body.sleeping {
                continue;
            }
            let motion = body.linear_velocity().length_squared()
                + body.angular_velocity() * body.angular_velocity();
            if motion < threshold {
                body.sleep_timer += 1;
                if body.sleep_timer >= frames {
                    body.sleeping = true;
                    body.reset_velocities();
                }
            } else {
                body.sleep_timer = 0;
            }
        }
    }

    fn enforce_kill_bounds(&mut self) {
        let out: Vec<BodyId> = self
            .bodies
            .iter()
            .filter(|b| {
                b.body_type() == RigidBodyType::Dynamic
                    && !self.kill_bounds.contains_point(b.position())
            })
            .map(|b| b.id)
            .collect();
        for id in out {
            // The body is known to exist; remove_body also cleans up its
            // manifolds and constraints.
            let _ = self.remove_body(id);
        }
    }

    fn event_for(&self, pcp: &PersistentContactPair, contact: &Contact) -> ContactEvent {
        let position_a = self
            .bodies
            .iter()
            .find(|b| b.id == pcp.body_a)
            .map_or(DVec2::ZERO, |b| b.position());
        ContactEvent {
            body_a: pcp.body_a,
            body_b: pcp.body_b,
            shape_a: pcp.shape_a,
            shape_b: pcp.shape_b,
            normal: pcp.normal,
            penetration: -contact.separation,
            position: position_a + contact.anchor_a,
            normal_impulse: contact.solver.normal_impulse,
            tangent_impulse: contact.solver.tangent_impulse,
            feature_id: contact.id,
        }
    }

    fn queue_contact_events(&mut self, key: &(ShapeId, ShapeId)) {
        if self.listener.is_none() {
            return;
        }
        let Some(pcp) = self.contacts.get(key) else {
            return;
        };
        let events: Vec<_> = pcp
            .contacts()
            .iter()
            .map(|contact| {
                let kind = if contact.is_persisted {
                    EventKind::Persisted
                } else {
                    EventKind::Added
                };
                (kind, self.event_for(pcp, contact))
            })
            .collect();
        self.pending_events.extend(events);
    }

    fn queue_removed_events(&mut self, mut pcp: PersistentContactPair) {
        if self.listener.is_none() || pcp.remove_invoked {
            return;
        }
        pcp.remove_invoked = true;
        let events: Vec<_> = pcp
            .contacts()
            .iter()
            .map(|contact| (EventKind::Removed, self.event_for(&pcp, contact)))
            .collect();
        self.pending_events.extend(events);
    }

    fn dispatch_events(&mut self) {
        if self.pending_events.is_empty() {
            return;
        }
        let Some(mut listener) = self.listener.take() else {
            self.pending_events.clear();
            return;
        };
        for (kind, event) in self.pending_events.drain(..) {
            match kind {
                EventKind::Added => listener.on_contact_added(&event),
                EventKind::Persisted => listener.on_contact_persisted(&event),
                EventKind::Removed => listener.on_contact_removed(&event),
            }
        }
        self.listener = Some(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::RigidBodyInit;
    use crate::constraint::DistanceJoint;
    use crate::shape::Shape;
    use glam::dvec2;

    fn disc(position: DVec2) -> RigidBody {
        let mut body = RigidBody::new(RigidBodyInit {
            body_type: RigidBodyType::Dynamic,
            position,
            ..Default::default()
        });
        body.add_shape(Shape::circle(DVec2::ZERO, 1.0).unwrap()).unwrap();
        body
    }

    #[test]
    fn add_remove_round_trip() {
        let mut space = Space::new();
        let keep = space.add_body(disc(dvec2(0.0, 0.0)));
        let id = space.add_body(disc(dvec2(5.0, 0.0)));
        assert_eq!(space.bodies().len(), 2);

        let removed = space.remove_body(id).unwrap();
        assert_eq!(removed.id(), 0);
        assert_eq!(space.bodies().len(), 1);
        assert_eq!(space.bodies()[0].id(), keep);
        assert!(matches!(
            space.remove_body(id),
            Err(PhysicsError::UnknownBody(gone)) if gone == id
        ));
    }

    #[test]
    fn body_ids_stay_monotonic_after_removal() {
        let mut space = Space::new();
        let a = space.add_body(disc(dvec2(0.0, 0.0)));
        let b = space.add_body(disc(dvec2(5.0, 0.0)));
        space.remove_body(a).unwrap();
        let c = space.add_body(disc(dvec2(10.0, 0.0)));
        assert!(c > b);
        let ids: Vec<_> = space.bodies().iter().map(|b| b.id()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn constraint_requires_known_bodies() {
        let mut space = Space::new();
        let a = space.add_body(disc(dvec2(0.0, 0.0)));
        let err = space.add_constraint(ConstraintEnum::Distance(DistanceJoint::new(
            Some(a),
            DVec2::ZERO,
            Some(999),
            DVec2::ZERO,
            2.0,
        )));
        assert_eq!(err, Err(PhysicsError::UnknownBody(999)));

        let err = space.add_constraint(ConstraintEnum::Distance(DistanceJoint::new(
            None,
            DVec2::ZERO,
            None,
            DVec2::ZERO,
            2.0,
        )));
        assert_eq!(err, Err(PhysicsError::ConstraintWithoutBodies));

        assert!(space
            .add_constraint(ConstraintEnum::Distance(DistanceJoint::new(
                Some(a),
                DVec2::ZERO,
                None,
                dvec2(5.0, 0.0),
                5.0,
            )))
            .is_ok());
    }

    #[test]
    fn removing_a_body_drops_its_constraints() {
        let mut space = Space::new();
        let a = space.add_body(disc(dvec2(0.0, 0.0)));
        let b = space.add_body(disc(dvec2(3.0, 0.0)));
        let joint = space
            .add_constraint(ConstraintEnum::Distance(DistanceJoint::new(
                Some(a),
                DVec2::ZERO,
                Some(b),
                DVec2::ZERO,
                3.0,
            )))
            .unwrap();
        space.remove_body(b).unwrap();
        assert!(space.constraint(joint).is_none());
    }

    #[test]
    fn zero_dt_and_zero_substeps_are_no_ops() {
        let mut space = Space::new();
        let id = space.add_body(disc(dvec2(0.0, 0.0)));
        space.step(0.0);
        assert_eq!(space.body(id).unwrap().position(), dvec2(0.0, 0.0));

        space.settings.substeps = 0;
        space.step(1.0 / 60.0);
        assert_eq!(space.body(id).unwrap().position(), dvec2(0.0, 0.0));
    }
}
