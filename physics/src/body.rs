//! Rigid bodies: state, mass properties derived from attached shapes, and
//! the two halves of symplectic Euler integration.

use glam::DVec2;

use crate::error::PhysicsError;
use crate::math::{rotate, Aabb, Transform};
use crate::shape::{Shape, ShapeId};

/// Unique body identity within a [`Space`](crate::space::Space); assigned
/// when the body is added.
pub type BodyId = u64;

/// Motion type of a rigid body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RigidBodyType {
    /// Never integrates and behaves as if it had infinite mass. Terrain and
    /// ground objects are usually static.
    #[default]
    Static,
    /// Affected by forces, gravity and collisions. Mass and inertia are
    /// derived from the attached shapes.
    Dynamic,
}

/// Surface and volume properties of a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub density: f64,
    pub restitution: f64,
    pub friction: f64,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            density: 1.0,
            restitution: 0.1,
            friction: 0.4,
        }
    }
}

/// Basic information for constructing bodies; can be reused for several.
#[derive(Clone, Copy, Debug, Default)]
pub struct RigidBodyInit {
    pub body_type: RigidBodyType,
    pub position: DVec2,
    pub angle: f64,
    pub linear_velocity: DVec2,
    pub angular_velocity: f64,
    pub material: Material,
}

/// A non-deformable object with mass.
///
/// `position` is the world-space center of mass; `origin` is the world
/// placement of the body's local frame (`origin = position - rotate(com,
/// angle)`), which is what shapes are transformed by. Keep polygon centroids
/// close to the local origin or the two drift apart and rotations look
/// off-center.
#[derive(Clone, Debug)]
pub struct RigidBody {
    pub(crate) id: BodyId,
    body_type: RigidBodyType,

    position: DVec2,
    angle: f64,
    origin: DVec2,
    com: DVec2,

    linear_velocity: DVec2,
    angular_velocity: f64,
    force: DVec2,
    torque: f64,

    mass: f64,
    inertia: f64,
    invmass: f64,
    invinertia: f64,

    pub material: Material,
    /// Scales the global gravity vector for this body; 1.0 = unaffected.
    pub gravity_scale: f64,
    /// Scales the space-wide linear damping for this body; 1.0 = unaffected.
    pub linear_damping_scale: f64,
    /// Scales the space-wide angular damping for this body; 1.0 = unaffected.
    pub angular_damping_scale: f64,

    /// Bodies sharing the same non-zero group never collide.
    pub collision_group: u32,
    /// Bitmask naming what this body is.
    pub collision_category: u32,
    /// Bitmask naming what this body collides with.
    pub collision_mask: u32,
    collision_enabled: bool,

    attractor: bool,
    pub(crate) sleeping: bool,
    pub(crate) sleep_timer: u32,

    shapes: Vec<Shape>,
    cached_aabb: Option<Aabb>,
}

impl RigidBody {
    pub fn new(init: RigidBodyInit) -> RigidBody {
        RigidBody {
            id: 0,
            body_type: init.body_type,
            position: init.position,
            angle: init.angle,
            origin: init.position,
            com: DVec2::ZERO,
            linear_velocity: init.linear_velocity,
            angular_velocity: init.angular_velocity,
            force: DVec2::ZERO,
            torque: 0.0,
            mass: 0.0,
            inertia: 0.0,
            invmass: 0.0,
            invinertia: 0.0,
            material: init.material,
            gravity_scale: 1.0,
            linear_damping_scale: 1.0,
            angular_damping_scale: 1.0,
            collision_group: 0,
            collision_category: u32::MAX,
            collision_mask: u32::MAX,
            collision_enabled: true,
            attractor: false,
            sleeping: false,
            sleep_timer: 0,
            shapes: Vec::new(),
            cached_aabb: None,
        }
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn body_type(&self) -> RigidBodyType {
        self.body_type
    }

    pub fn set_body_type(&mut self, body_type: RigidBodyType) {
        self.body_type = body_type;
        self.recompute_mass();
        self.wake();
    }

    /// World-space center of mass.
    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn set_position(&mut self, position: DVec2) {
        self.position = position;
        self.origin = position - rotate(self.com, self.angle);
        self.cached_aabb = None;
        self.wake();
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: f64) {
        self.angle = angle;
        self.origin = self.position - rotate(self.com, self.angle);
        self.cached_aabb = None;
        self.wake();
    }

    /// World placement of the body's local frame.
    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    /// Local offset from the frame origin to the center of mass.
    pub fn com(&self) -> DVec2 {
        self.com
    }

    pub fn linear_velocity(&self) -> DVec2 {
        self.linear_velocity
    }

    pub fn set_linear_velocity(&mut self, velocity: DVec2) {
        self.linear_velocity = velocity;
        self.wake();
    }

    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    pub fn set_angular_velocity(&mut self, velocity: f64) {
        self.angular_velocity = velocity;
        self.wake();
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Override the derived mass, scaling inertia along with it.
    /// Usually unnecessary: mass is re-derived whenever shapes change.
    pub fn set_mass(&mut self, mass: f64) -> Result<(), PhysicsError> {
        if !(mass > 0.0) {
            return Err(PhysicsError::InvalidMass(mass));
        }
        if self.mass > 0.0 {
            self.inertia *= mass / self.mass;
        }
        self.mass = mass;
        self.refresh_inverse_mass();
        Ok(())
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Setting inertia to 0 disables rotation for this body.
    pub fn set_inertia(&mut self, inertia: f64) {
        self.inertia = inertia.max(0.0);
        self.refresh_inverse_mass();
    }

    pub fn invmass(&self) -> f64 {
        self.invmass
    }

    pub fn invinertia(&self) -> f64 {
        self.invinertia
    }

    pub fn collision_enabled(&self) -> bool {
        self.collision_enabled
    }

    /// A body with collisions disabled does not collide with anything.
    pub fn enable_collisions(&mut self) {
        self.collision_enabled = true;
    }

    pub fn disable_collisions(&mut self) {
        self.collision_enabled = false;
    }

    pub fn is_attractor(&self) -> bool {
        self.attractor
    }

    /// Attractors pull every dynamic body toward themselves each step with a
    /// gameplay-scaled gravitational force.
    pub fn set_attractor(&mut self, attractor: bool) {
        self.attractor = attractor;
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Clear the sleeping state; called implicitly by every operation that
    /// injects motion.
    pub fn wake(&mut self) {
        self.sleeping = false;
        self.sleep_timer = 0;
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub(crate) fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    /// Attach a shape; mass, center of mass and inertia are re-derived from
    /// the full shape list.
    pub fn add_shape(&mut self, shape: Shape) -> Result<ShapeId, PhysicsError> {
        if self.shapes.iter().any(|s| s.id() == shape.id()) {
            return Err(PhysicsError::DuplicateShape(shape.id()));
        }
        let id = shape.id();
        self.shapes.push(shape);
        self.recompute_mass();
        self.cached_aabb = None;
        Ok(id)
    }

    /// Detach a shape and hand it back.
    pub fn remove_shape(&mut self, id: ShapeId) -> Result<Shape, PhysicsError> {
        let index = self
            .shapes
            .iter()
            .position(|s| s.id() == id)
            .ok_or(PhysicsError::UnknownShape(id))?;
        let shape = self.shapes.remove(index);
        self.recompute_mass();
        self.cached_aabb = None;
        Ok(shape)
    }

    /// Sum `density * area` and the matching second moments over all shapes.
    fn recompute_mass(&mut self) {
        if self.body_type == RigidBodyType::Static {
            self.mass = 0.0;
            self.inertia = 0.0;
            self.invmass = 0.0;
            self.invinertia = 0.0;
            self.com = DVec2::ZERO;
            self.origin = self.position;
            return;
        }

        let mut mass = 0.0;
        let mut com = DVec2::ZERO;
        for shape in &self.shapes {
            let props = shape.mass_properties(self.material.density);
            mass += props.mass;
            com += props.centroid * props.mass;
        }
        if mass > 0.0 {
            com /= mass;
        }

        // Parallel axis theorem: each shape's centroidal inertia shifted to
        // the shared center of mass.
        let mut inertia = 0.0;
        for shape in &self.shapes {
            let props = shape.mass_properties(self.material.density);
            inertia += props.inertia + props.mass * (props.centroid - com).length_squared();
        }

        self.mass = mass;
        self.inertia = inertia;
        self.com = com;
        self.position = self.origin + rotate(com, self.angle);
        self.refresh_inverse_mass();
    }

    fn refresh_inverse_mass(&mut self) {
        if self.body_type == RigidBodyType::Static {
            self.invmass = 0.0;
            self.invinertia = 0.0;
        } else {
            self.invmass = if self.mass > 0.0 { 1.0 / self.mass } else { 0.0 };
            self.invinertia = if self.inertia > 0.0 { 1.0 / self.inertia } else { 0.0 };
        }
    }

    /// Accumulate a force through the center of mass.
    pub fn apply_force(&mut self, force: DVec2) {
        self.force += force;
        self.wake();
    }

    /// Accumulate a force at a local point, adding the torque `r x F`.
    pub fn apply_force_at(&mut self, force: DVec2, local_point: DVec2) {
        let r = rotate(local_point, self.angle);
        self.force += force;
        self.torque += r.perp_dot(force);
        self.wake();
    }

    pub fn apply_torque(&mut self, torque: f64) {
        self.torque += torque;
        self.wake();
    }

    /// Instantaneous velocity change. `r` is the application point relative
    /// to the center of mass, in world orientation.
    pub fn apply_impulse(&mut self, impulse: DVec2, r: DVec2) {
        self.linear_velocity += impulse * self.invmass;
        self.angular_velocity += r.perp_dot(impulse) * self.invinertia;
        self.wake();
    }

    /// Like [`RigidBody::apply_impulse`], but without waking the body; the
    /// solver warm-start must not clear sleep bookkeeping.
    pub(crate) fn apply_impulse_internal(&mut self, impulse: DVec2, r: DVec2) {
        self.linear_velocity += impulse * self.invmass;
        self.angular_velocity += r.perp_dot(impulse) * self.invinertia;
    }

    /// Solver-internal torque impulse; does not clear sleep bookkeeping.
    pub(crate) fn apply_angular_impulse_internal(&mut self, impulse: f64) {
        self.angular_velocity += impulse * self.invinertia;
    }

    /// Set all velocities and pending forces to zero.
    pub fn reset_velocities(&mut self) {
        self.linear_velocity = DVec2::ZERO;
        self.angular_velocity = 0.0;
        self.force = DVec2::ZERO;
        self.torque = 0.0;
    }

    /// `1/2 m |v|^2`
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.linear_velocity.length_squared()
    }

    /// `1/2 I w^2`
    pub fn rotational_energy(&self) -> f64 {
        0.5 * self.inertia * self.angular_velocity * self.angular_velocity
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.origin, self.angle)
    }

    /// Union of the attached shapes' world bounding boxes, cached until the
    /// body moves.
    pub fn aabb(&mut self) -> Aabb {
        if let Some(aabb) = self.cached_aabb {
            return aabb;
        }
        let transform = Transform::new(self.origin, self.angle);
        let mut aabb: Option<Aabb> = None;
        for shape in &mut self.shapes {
            let shape_aabb = shape.aabb(transform);
            aabb = Some(match aabb {
                Some(acc) => acc.union(&shape_aabb),
                None => shape_aabb,
            });
        }
        let aabb = aabb.unwrap_or(Aabb::new(
            self.position.x,
            self.position.y,
            self.position.x,
            self.position.y,
        ));
        self.cached_aabb = Some(aabb);
        aabb
    }

    pub(crate) fn invalidate_caches(&mut self) {
        self.cached_aabb = None;
    }

    /// The AABB from the most recent [`RigidBody::aabb`] call, if the body
    /// has not moved since.
    pub(crate) fn cached_aabb(&self) -> Option<Aabb> {
        self.cached_aabb
    }

    /// Apply forces and gravity, update velocities and damp them.
    /// First half of symplectic Euler; also resets the force accumulators.
    pub(crate) fn integrate_accelerations(
        &mut self,
        gravity: DVec2,
        linear_damping: f64,
        angular_damping: f64,
        dt: f64,
    ) {
        if self.body_type == RigidBodyType::Static || self.sleeping {
            self.force = DVec2::ZERO;
            self.torque = 0.0;
            return;
        }

        self.linear_velocity += (self.force * self.invmass + gravity * self.gravity_scale) * dt;
        self.angular_velocity += self.torque * self.invinertia * dt;

        self.linear_velocity *= 0.99f64.powf(linear_damping * self.linear_damping_scale * dt);
        self.angular_velocity *= 0.99f64.powf(angular_damping * self.angular_damping_scale * dt);

        self.force = DVec2::ZERO;
        self.torque = 0.0;
    }

    /// Update position from velocity and refresh the frame origin.
    /// Second half of symplectic Euler.
    pub(crate) fn integrate_velocities(&mut self, dt: f64) {
        if self.body_type == RigidBodyType::Static || self.sleeping {
            return;
        }
        self.position += self.linear_velocity * dt;
        self.angle += self.angular_velocity * dt;
        self.origin = self.position - rotate(self.com, self.angle);
    }

    /// Positional correction from the NGS solver; bypasses velocities.
    pub(crate) fn shift(&mut self, translation: DVec2, rotation: f64) {
        self.position += translation;
        self.angle += rotation;
        self.origin = self.position - rotate(self.com, self.angle);
        self.cached_aabb = None;
    }
}

/// Disjoint mutable borrows of two bodies in the same slice.
pub(crate) fn body_pair_mut(
    bodies: &mut [RigidBody],
    i: usize,
    j: usize,
) -> (&mut RigidBody, &mut RigidBody) {
    assert_ne!(i, j, "a pair needs two distinct bodies");
    if i < j {
        let (head, tail) = bodies.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = bodies.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    fn dynamic_disc(radius: f64) -> RigidBody {
        let mut body = RigidBody::new(RigidBodyInit {
            body_type: RigidBodyType::Dynamic,
            ..Default::default()
        });
        body.add_shape(Shape::circle(DVec2::ZERO, radius).unwrap())
            .unwrap();
        body
    }

    #[test]
    fn mass_follows_shapes() {
        let mut body = dynamic_disc(1.0);
        let single = body.mass();
        assert!((single - std::f64::consts::PI).abs() < 1e-9);

        let second = Shape::circle(dvec2(2.0, 0.0), 1.0).unwrap();
        let id = body.add_shape(second).unwrap();
        assert!((body.mass() - 2.0 * single).abs() < 1e-9);
        // Center of mass moved midway between the discs.
        assert!((body.com() - dvec2(1.0, 0.0)).length() < 1e-9);

        body.remove_shape(id).unwrap();
        assert!((body.mass() - single).abs() < 1e-9);
        assert!(body.com().length() < 1e-9);
    }

    #[test]
    fn static_bodies_have_zero_inverse_mass() {
        let mut body = RigidBody::new(RigidBodyInit::default());
        body.add_shape(Shape::circle(DVec2::ZERO, 2.0).unwrap())
            .unwrap();
        assert_eq!(body.invmass(), 0.0);
        assert_eq!(body.invinertia(), 0.0);
    }

    #[test]
    fn static_bodies_do_not_integrate() {
        let mut body = RigidBody::new(RigidBodyInit::default());
        body.apply_force(dvec2(10.0, 0.0));
        body.integrate_accelerations(dvec2(0.0, 9.81), 0.0, 0.0, 1.0 / 60.0);
        body.integrate_velocities(1.0 / 60.0);
        assert_eq!(body.position(), DVec2::ZERO);
        assert_eq!(body.linear_velocity(), DVec2::ZERO);
    }

    #[test]
    fn gravity_scale_is_honored() {
        let mut body = dynamic_disc(1.0);
        body.gravity_scale = 0.0;
        body.integrate_accelerations(dvec2(0.0, 9.81), 0.0, 0.0, 1.0 / 60.0);
        assert_eq!(body.linear_velocity(), DVec2::ZERO);
    }

    #[test]
    fn impulse_changes_velocity_by_invmass() {
        let mut body = dynamic_disc(1.0);
        let mass = body.mass();
        body.apply_impulse(dvec2(3.0, 0.0), DVec2::ZERO);
        assert!((body.linear_velocity().x - 3.0 / mass).abs() < 1e-12);
        assert_eq!(body.angular_velocity(), 0.0);
    }

    #[test]
    fn off_center_force_adds_torque() {
        let mut body = dynamic_disc(1.0);
        body.apply_force_at(dvec2(0.0, 1.0), dvec2(1.0, 0.0));
        body.integrate_accelerations(DVec2::ZERO, 0.0, 0.0, 1.0);
        assert!(body.angular_velocity() > 0.0);
    }

    #[test]
    fn set_mass_rejects_nonpositive() {
        let mut body = dynamic_disc(1.0);
        assert_eq!(body.set_mass(0.0), Err(PhysicsError::InvalidMass(0.0)));
        assert!(body.set_mass(5.0).is_ok());
        assert!((body.invmass() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn pair_borrow_is_order_independent() {
        let mut bodies = vec![dynamic_disc(1.0), dynamic_disc(2.0)];
        bodies[0].id = 10;
        bodies[1].id = 20;
        let (a, b) = body_pair_mut(&mut bodies, 1, 0);
        assert_eq!(a.id, 20);
        assert_eq!(b.id, 10);
    }
}
